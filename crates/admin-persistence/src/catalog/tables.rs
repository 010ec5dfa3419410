//! Esquema canónico base. Congelado: todo lo que se agregue después va en
//! `migrations` como operación nueva.

use admin_core::{column, TableDef};

pub const USERS: TableDef = TableDef { name: "users",
                                       columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                  column("username", "TEXT UNIQUE NOT NULL"),
                                                  column("password_hash", "TEXT NOT NULL"),
                                                  column("role", "TEXT NOT NULL DEFAULT 'admin'"),
                                                  column("display_name", "TEXT"),
                                                  column("created_at", "DATETIME DEFAULT CURRENT_TIMESTAMP"),
                                                  column("updated_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                       constraints: &[] };

pub const SITE_CONTENT: TableDef = TableDef { name: "site_content",
                                              columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                         column("section_key", "TEXT UNIQUE NOT NULL"),
                                                         column("section_name", "TEXT NOT NULL"),
                                                         column("content_json", "TEXT NOT NULL DEFAULT '{}'"),
                                                         column("sort_order", "INTEGER DEFAULT 0"),
                                                         column("updated_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                              constraints: &[] };

pub const CALCULATOR_TABS: TableDef = TableDef { name: "calculator_tabs",
                                                 columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                            column("tab_key", "TEXT UNIQUE NOT NULL"),
                                                            column("name_ru", "TEXT NOT NULL"),
                                                            column("name_am", "TEXT NOT NULL"),
                                                            column("sort_order", "INTEGER DEFAULT 0"),
                                                            column("is_active", "INTEGER DEFAULT 1")],
                                                 constraints: &[] };

pub const CALCULATOR_SERVICES: TableDef =
    TableDef { name: "calculator_services",
               columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                          column("tab_id", "INTEGER NOT NULL"),
                          column("name_ru", "TEXT NOT NULL"),
                          column("name_am", "TEXT NOT NULL"),
                          column("price", "INTEGER NOT NULL"),
                          column("price_type", "TEXT DEFAULT 'fixed'"),
                          column("price_tiers_json", "TEXT"),
                          column("tier_desc_ru", "TEXT"),
                          column("tier_desc_am", "TEXT"),
                          column("sort_order", "INTEGER DEFAULT 0"),
                          column("is_active", "INTEGER DEFAULT 1")],
               constraints: &["FOREIGN KEY (tab_id) REFERENCES calculator_tabs(id) ON DELETE CASCADE"] };

pub const TELEGRAM_MESSAGES: TableDef = TableDef { name: "telegram_messages",
                                                   columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                              column("button_key", "TEXT UNIQUE NOT NULL"),
                                                              column("button_label_ru", "TEXT NOT NULL DEFAULT ''"),
                                                              column("button_label_am", "TEXT NOT NULL DEFAULT ''"),
                                                              column("telegram_url", "TEXT NOT NULL"),
                                                              column("message_template_ru", "TEXT NOT NULL DEFAULT ''"),
                                                              column("message_template_am", "TEXT NOT NULL DEFAULT ''"),
                                                              column("description", "TEXT DEFAULT ''"),
                                                              column("is_active", "INTEGER DEFAULT 1"),
                                                              column("sort_order", "INTEGER DEFAULT 0")],
                                                   constraints: &[] };

pub const CUSTOM_SCRIPTS: TableDef = TableDef { name: "custom_scripts",
                                                columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                           column("name", "TEXT NOT NULL"),
                                                           column("description", "TEXT DEFAULT ''"),
                                                           column("script_type", "TEXT NOT NULL DEFAULT 'js'"),
                                                           column("placement", "TEXT NOT NULL DEFAULT 'head'"),
                                                           column("code", "TEXT NOT NULL DEFAULT ''"),
                                                           column("is_active", "INTEGER DEFAULT 1"),
                                                           column("sort_order", "INTEGER DEFAULT 0")],
                                                constraints: &[] };

pub const PAGE_VIEWS: TableDef = TableDef { name: "page_views",
                                            columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                       column("page", "TEXT NOT NULL DEFAULT '/'"),
                                                       column("referrer", "TEXT DEFAULT ''"),
                                                       column("user_agent", "TEXT DEFAULT ''"),
                                                       column("lang", "TEXT DEFAULT 'ru'"),
                                                       column("country", "TEXT DEFAULT ''"),
                                                       column("created_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                            constraints: &[] };

pub const SECTION_ORDER: TableDef = TableDef { name: "section_order",
                                               columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                          column("section_id", "TEXT UNIQUE NOT NULL"),
                                                          column("sort_order", "INTEGER DEFAULT 0"),
                                                          column("is_visible", "INTEGER DEFAULT 1"),
                                                          column("label_ru", "TEXT DEFAULT ''"),
                                                          column("label_am", "TEXT DEFAULT ''")],
                                               constraints: &[] };

pub const REFERRAL_CODES: TableDef = TableDef { name: "referral_codes",
                                                columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                           column("code", "TEXT UNIQUE NOT NULL"),
                                                           column("description", "TEXT DEFAULT ''"),
                                                           column("discount_percent", "INTEGER DEFAULT 0"),
                                                           column("free_reviews", "INTEGER DEFAULT 0"),
                                                           column("is_active", "INTEGER DEFAULT 1"),
                                                           column("uses_count", "INTEGER DEFAULT 0"),
                                                           column("created_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                                constraints: &[] };

pub const LEADS: TableDef = TableDef { name: "leads",
                                       columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                  column("source", "TEXT NOT NULL DEFAULT 'form'"),
                                                  column("name", "TEXT DEFAULT ''"),
                                                  column("contact", "TEXT DEFAULT ''"),
                                                  column("product", "TEXT DEFAULT ''"),
                                                  column("service", "TEXT DEFAULT ''"),
                                                  column("message", "TEXT DEFAULT ''"),
                                                  column("calc_data", "TEXT DEFAULT ''"),
                                                  column("lang", "TEXT DEFAULT 'ru'"),
                                                  column("status", "TEXT DEFAULT 'new'"),
                                                  column("notes", "TEXT DEFAULT ''"),
                                                  column("referral_code", "TEXT DEFAULT ''"),
                                                  column("ip", "TEXT DEFAULT ''"),
                                                  column("user_agent", "TEXT DEFAULT ''"),
                                                  column("created_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                       constraints: &[] };

pub const SITE_SETTINGS: TableDef = TableDef { name: "site_settings",
                                               columns: &[column("key", "TEXT PRIMARY KEY"),
                                                          column("value", "TEXT NOT NULL DEFAULT ''"),
                                                          column("updated_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                               constraints: &[] };

pub const TELEGRAM_BOT_CONFIG: TableDef = TableDef { name: "telegram_bot_config",
                                                     columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                                column("bot_token", "TEXT NOT NULL DEFAULT ''"),
                                                                column("chat_id", "TEXT NOT NULL DEFAULT ''"),
                                                                column("chat_name", "TEXT DEFAULT ''"),
                                                                column("notify_leads", "INTEGER DEFAULT 1"),
                                                                column("notify_calc", "INTEGER DEFAULT 0"),
                                                                column("is_active", "INTEGER DEFAULT 1"),
                                                                column("created_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                                     constraints: &[] };

pub const PDF_TEMPLATES: TableDef =
    TableDef { name: "pdf_templates",
               columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                          column("template_key", "TEXT UNIQUE NOT NULL DEFAULT 'default'"),
                          column("header_ru", "TEXT DEFAULT 'Коммерческое предложение'"),
                          column("header_am", "TEXT DEFAULT ''"),
                          column("footer_ru", "TEXT DEFAULT ''"),
                          column("footer_am", "TEXT DEFAULT ''"),
                          column("intro_ru", "TEXT DEFAULT ''"),
                          column("intro_am", "TEXT DEFAULT ''"),
                          column("outro_ru", "TEXT DEFAULT ''"),
                          column("outro_am", "TEXT DEFAULT ''"),
                          column("button_label_ru", "TEXT DEFAULT 'Скачать КП (PDF)'"),
                          column("button_label_am", "TEXT DEFAULT ''"),
                          column("company_name", "TEXT DEFAULT 'Go to Top'"),
                          column("company_phone", "TEXT DEFAULT ''"),
                          column("company_email", "TEXT DEFAULT ''"),
                          column("company_address", "TEXT DEFAULT ''"),
                          column("updated_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
               constraints: &[] };

/// Tabla marcador: se crea al final del bootstrap, así que su presencia
/// implica que todo lo anterior existe.
pub const SLOT_COUNTER: TableDef =
    TableDef { name: "slot_counter",
               columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                          column("total_slots", "INTEGER DEFAULT 10"),
                          column("booked_slots", "INTEGER DEFAULT 0"),
                          column("label_ru", "TEXT DEFAULT 'Свободных мест на этой неделе'"),
                          column("label_am", "TEXT DEFAULT ''"),
                          column("show_timer", "INTEGER DEFAULT 1"),
                          column("reset_day", "TEXT DEFAULT 'monday'"),
                          column("updated_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
               constraints: &[] };

/// Orden de creación del bootstrap; `calculator_tabs` antes que
/// `calculator_services` por la FK.
pub const BASELINE: [TableDef; 14] = [USERS,
                                      SITE_CONTENT,
                                      CALCULATOR_TABS,
                                      CALCULATOR_SERVICES,
                                      TELEGRAM_MESSAGES,
                                      CUSTOM_SCRIPTS,
                                      PAGE_VIEWS,
                                      SECTION_ORDER,
                                      REFERRAL_CODES,
                                      LEADS,
                                      SITE_SETTINGS,
                                      TELEGRAM_BOT_CONFIG,
                                      PDF_TEMPLATES,
                                      SLOT_COUNTER];
