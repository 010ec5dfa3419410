//! Operaciones posteriores al esquema base. Append-only: nunca reordenar,
//! renombrar ni borrar una entrada ya desplegada.

use admin_core::backfill::Encoding;
use admin_core::{column, Action, BackfillRule, ColumnDef, IndexDef, Operation, RowFilter, TableDef, TagSet};

pub const SLOT_COUNTER_POSITION: ColumnDef = column("position", "TEXT DEFAULT 'after-hero'");
pub const USERS_IS_ACTIVE: ColumnDef = column("is_active", "INTEGER NOT NULL DEFAULT 1");
pub const USERS_PERMISSIONS: ColumnDef = column("permissions", "TEXT NOT NULL DEFAULT '[]'");
pub const LEADS_ASSIGNED_TO: ColumnDef = column("assigned_to", "INTEGER");
pub const LEADS_ASSIGNED_NAME: ColumnDef = column("assigned_name", "TEXT DEFAULT ''");

pub const ROLE_TEMPLATES: TableDef = TableDef { name: "role_templates",
                                                columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                           column("role", "TEXT UNIQUE NOT NULL"),
                                                           column("label", "TEXT NOT NULL DEFAULT ''"),
                                                           column("sections", "TEXT NOT NULL DEFAULT '[]'")],
                                                constraints: &[] };

pub const ACTIVITY_LOG: TableDef = TableDef { name: "activity_log",
                                              columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                         column("user_id", "INTEGER"),
                                                         column("user_name", "TEXT DEFAULT ''"),
                                                         column("action", "TEXT NOT NULL"),
                                                         column("details", "TEXT DEFAULT ''"),
                                                         column("created_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                              constraints: &[] };

pub const IDX_LEADS_CREATED_AT: IndexDef =
    IndexDef { name: "idx_leads_created_at", table: "leads", columns: &["created_at"], unique: false };
pub const IDX_LEADS_STATUS: IndexDef = IndexDef { name: "idx_leads_status", table: "leads", columns: &["status"], unique: false };
pub const IDX_ACTIVITY_LOG_CREATED_AT: IndexDef =
    IndexDef { name: "idx_activity_log_created_at", table: "activity_log", columns: &["created_at"], unique: false };

/// Etiquetas de sección de versiones anteriores del panel y su nombre actual.
pub const LEGACY_SECTION_TAGS: &[(&str, &str)] = &[("crm", "leads"),
                                                   ("calc", "calculator"),
                                                   ("calculator_tabs", "calculator"),
                                                   ("site", "content"),
                                                   ("content_editor", "content"),
                                                   ("stats", "analytics")];

pub fn rename_legacy_sections(tags: &TagSet) -> TagSet {
    tags.renamed(LEGACY_SECTION_TAGS)
}

/// Sólo se aplica a la cuenta `admin` original; `admin` sigue siendo el rol
/// por defecto de las cuentas nuevas.
pub fn rename_legacy_role(tags: &TagSet) -> TagSet {
    tags.renamed(&[("admin", "main_admin")])
}

pub fn operations() -> Vec<Operation> {
    vec![Operation::new("slot_counter_position",
                        "slot counter placement on the landing page",
                        Action::AddColumn { table: "slot_counter", column: SLOT_COUNTER_POSITION }),
         Operation::new("users_is_active",
                        "employee accounts can be deactivated",
                        Action::AddColumn { table: "users", column: USERS_IS_ACTIVE }),
         Operation::new("users_permissions",
                        "per-user section permissions (JSON array)",
                        Action::AddColumn { table: "users", column: USERS_PERMISSIONS }),
         Operation::new("role_templates", "default sections per role", Action::CreateTable(ROLE_TEMPLATES)),
         Operation::new("activity_log", "append-only audit trail", Action::CreateTable(ACTIVITY_LOG)),
         Operation::new("idx_leads_created_at", "leads listing by date", Action::CreateIndex(IDX_LEADS_CREATED_AT)),
         Operation::new("idx_leads_status", "leads filtering by status", Action::CreateIndex(IDX_LEADS_STATUS)),
         Operation::new("idx_activity_log_created_at",
                        "activity log listing by date",
                        Action::CreateIndex(IDX_ACTIVITY_LOG_CREATED_AT)),
         Operation::new("users_permissions_legacy_tags",
                        "rename legacy section tags in users.permissions",
                        Action::Backfill(BackfillRule { table: "users",
                                                        key_column: "id",
                                                        column: "permissions",
                                                        encoding: Encoding::JsonArray,
                                                        transform: rename_legacy_sections,
                                                        only_where: None })),
         Operation::new("users_role_main_admin",
                        "the original admin account becomes main_admin",
                        Action::Backfill(BackfillRule { table: "users",
                                                        key_column: "id",
                                                        column: "role",
                                                        encoding: Encoding::Scalar,
                                                        transform: rename_legacy_role,
                                                        only_where: Some(RowFilter { column: "username",
                                                                                     equals: "admin" }) })),
         Operation::new("leads_assigned_to",
                        "lead assignment to an employee",
                        Action::AddColumn { table: "leads", column: LEADS_ASSIGNED_TO }),
         Operation::new("leads_assigned_name",
                        "assigned employee display name",
                        Action::AddColumn { table: "leads", column: LEADS_ASSIGNED_NAME })]
}
