//! Datos de referencia por defecto. Cada fila lleva una clave natural única
//! (o PK explícita) para que el insert-or-ignore no duplique.

use admin_core::{SeedRow, SeedRule};

/// Bloques de la landing en su orden por defecto.
const SECTIONS: [(&str, &str); 17] = [("hero", "Главный экран"),
                                      ("ticker", "Бегущая строка"),
                                      ("wb-banner", "WB Баннер"),
                                      ("stats-bar", "Статистика"),
                                      ("about", "О нас"),
                                      ("services", "Услуги"),
                                      ("buyout-detail", "Детали выкупа"),
                                      ("why-buyouts", "Почему выкупы"),
                                      ("wb-official", "WB официально"),
                                      ("calculator", "Калькулятор"),
                                      ("process", "Как мы работаем"),
                                      ("warehouse", "Склад"),
                                      ("guarantee", "Гарантии"),
                                      ("comparison", "Сравнение"),
                                      ("important", "Важно знать"),
                                      ("faq", "FAQ"),
                                      ("contact", "Контакты")];

pub const ALL_SECTIONS: [&str; 9] =
    ["dashboard", "leads", "employees", "permissions", "orders", "calculator", "content", "analytics", "settings"];

/// (rol, etiqueta, secciones por defecto)
const ROLES: [(&str, &str, &[&str]); 6] =
    [("main_admin", "Главный Админ", &ALL_SECTIONS),
     ("developer", "Разработчик", &["dashboard", "content", "calculator", "analytics", "settings"]),
     ("analyst", "Аналитик", &["dashboard", "leads", "analytics"]),
     ("operator", "Оператор", &["dashboard", "leads", "orders"]),
     ("buyer", "Выкупщик", &["dashboard", "orders"]),
     ("courier", "Курьер", &["dashboard", "orders"])];

fn section_order_rows() -> Vec<SeedRow> {
    SECTIONS.iter()
            .zip(0_i64..)
            .map(|((id, label), order)| {
                SeedRow::new().text("section_id", *id)
                              .int("sort_order", order)
                              .int("is_visible", 1)
                              .text("label_ru", *label)
                              .text("label_am", "")
            })
            .collect()
}

fn role_template_rows() -> Vec<SeedRow> {
    ROLES.iter()
         .map(|(role, label, sections)| {
             // serializar &[&str] no puede fallar
             let encoded = serde_json::to_string(sections).unwrap_or_else(|_| "[]".to_string());
             SeedRow::new().text("role", *role).text("label", *label).text("sections", encoded)
         })
         .collect()
}

fn slot_counter_rows() -> Vec<SeedRow> {
    vec![SeedRow::new().int("id", 1)]
}

fn pdf_template_rows() -> Vec<SeedRow> {
    vec![SeedRow::new().text("template_key", "default")]
}

pub fn rules() -> Vec<SeedRule> {
    vec![SeedRule { table: "section_order", rows: section_order_rows },
         SeedRule { table: "role_templates", rows: role_template_rows },
         SeedRule { table: "slot_counter", rows: slot_counter_rows },
         SeedRule { table: "pdf_templates", rows: pdf_template_rows }]
}
