#![allow(clippy::unwrap_used)]

use super::*;
use crate::store::{self, MemoryStorage};

fn run(storage: &mut MemoryStorage, line: &str) -> Result<String> {
    let args: Vec<String> = line.split_whitespace().map(String::from).collect();
    let inv = Invocation::parse(&args)?;
    let mut out = Vec::new();
    as_cli(&inv, storage, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn logged_in() -> MemoryStorage {
    let mut storage = MemoryStorage::new();
    run(&mut storage, "login alice secret1").unwrap();
    storage
}

// ── Argument helpers ─────────────────────────────────────────

#[test]
fn test_positionals_skip_flag_values() {
    let args: Vec<String> = "Coffee 5 --month 2024-03 Food --recurring"
        .split_whitespace()
        .map(String::from)
        .collect();
    assert_eq!(positionals(&args), vec!["Coffee", "5", "Food"]);
    assert_eq!(flag_value(&args, "--month"), Some("2024-03"));
    assert!(has_flag(&args, "--recurring"));
    assert!(!has_flag(&args, "--yes"));
}

// ── Session ──────────────────────────────────────────────────

#[test]
fn test_login_whoami_logout() {
    let mut storage = MemoryStorage::new();
    assert_eq!(run(&mut storage, "whoami").unwrap(), "Not logged in\n");
    assert_eq!(run(&mut storage, "login alice secret1").unwrap(), "Logged in as alice\n");
    assert_eq!(run(&mut storage, "whoami").unwrap(), "alice\n");
    run(&mut storage, "logout").unwrap();
    assert_eq!(run(&mut storage, "whoami").unwrap(), "Not logged in\n");
}

#[test]
fn test_login_short_password_fails() {
    let mut storage = MemoryStorage::new();
    assert!(run(&mut storage, "login alice abc").is_err());
}

#[test]
fn test_ledger_command_requires_session() {
    let mut storage = MemoryStorage::new();
    let err = run(&mut storage, "list").unwrap_err();
    assert!(err.to_string().contains("not logged in"));
}

// ── Ledger commands ──────────────────────────────────────────

#[test]
fn test_add_list_and_summary() {
    let mut storage = logged_in();
    run(&mut storage, "add Coffee 5 Food 2024-03-01").unwrap();
    run(&mut storage, "add Bus 2 transport 2024-03-15 --recurring").unwrap();
    run(&mut storage, "budget 10").unwrap();

    let list = run(&mut storage, "list").unwrap();
    let bus_at = list.find("Bus").unwrap();
    let coffee_at = list.find("Coffee").unwrap();
    assert!(bus_at < coffee_at, "newest first:\n{list}");

    let summary = run(&mut storage, "summary").unwrap();
    assert!(summary.contains("Total:      ₹7.00"), "{summary}");
    assert!(summary.contains("Remaining:  ₹3.00"), "{summary}");
    assert!(summary.contains("Spending: 70% used."), "{summary}");
    assert!(summary.contains("Mar 24"), "{summary}");
}

#[test]
fn test_summary_over_budget() {
    let mut storage = logged_in();
    run(&mut storage, "add Coffee 5 Food 2024-03-01").unwrap();
    run(&mut storage, "add Bus 2 Transport 2024-03-15").unwrap();
    run(&mut storage, "budget 5").unwrap();
    let summary = run(&mut storage, "summary").unwrap();
    assert!(summary.contains("OVER BUDGET! By ₹2.00"), "{summary}");
}

#[test]
fn test_add_invalid_input_reports_error() {
    let mut storage = logged_in();
    assert!(run(&mut storage, "add Coffee 0 Food 2024-03-01").is_err());
    assert!(run(&mut storage, "add Coffee 5 Snacks 2024-03-01").is_err());
    assert!(run(&mut storage, "add Coffee 5").is_err());
    assert_eq!(run(&mut storage, "list").unwrap(), "No expenses found.\n");
}

#[test]
fn test_list_with_filters() {
    let mut storage = logged_in();
    run(&mut storage, "add Coffee 5 Food 2024-03-01").unwrap();
    run(&mut storage, "add Bus 2 Transport 2024-03-15").unwrap();
    run(&mut storage, "add Lunch 9 Food 2024-04-02").unwrap();

    let list = run(&mut storage, "list --category Food --month 2024-03").unwrap();
    assert!(list.contains("Coffee"));
    assert!(!list.contains("Bus"));
    assert!(!list.contains("Lunch"));
    assert!(list.contains("Found 1 matching expenses"));
}

#[test]
fn test_edit_and_delete_by_id() {
    let mut storage = logged_in();
    run(&mut storage, "add Coffee 5 Food 2024-03-01").unwrap();
    let id = store::load(&storage, &Scope::user("alice")).unwrap().expenses[0].id;

    run(&mut storage, &format!("edit {id} Latte 6 Food 2024-03-02")).unwrap();
    let ledger = store::load(&storage, &Scope::user("alice")).unwrap();
    assert_eq!(ledger.expenses[0].name, "Latte");

    assert!(run(&mut storage, "edit 1 Ghost 1 Other 2024-01-01").is_err());

    assert_eq!(
        run(&mut storage, &format!("delete {id}")).unwrap(),
        "Expense deleted: Latte\n"
    );
    assert!(run(&mut storage, &format!("delete {id}"))
        .unwrap()
        .contains("nothing to delete"));
}

#[test]
fn test_budget_show_and_reject_negative() {
    let mut storage = logged_in();
    assert_eq!(run(&mut storage, "budget").unwrap(), "No budget set\n");
    run(&mut storage, "budget 1500").unwrap();
    assert_eq!(run(&mut storage, "budget").unwrap(), "Budget: ₹1,500.00\n");
    assert!(run(&mut storage, "budget -3").is_err());
    assert!(run(&mut storage, "budget lots").is_err());
}

#[test]
fn test_budget_accepts_formatted_amounts() {
    let mut storage = logged_in();
    run(&mut storage, "budget ₹500").unwrap();
    assert_eq!(run(&mut storage, "budget").unwrap(), "Budget: ₹500.00\n");
    run(&mut storage, "budget 1,000").unwrap();
    assert_eq!(run(&mut storage, "budget").unwrap(), "Budget: ₹1,000.00\n");
}

#[test]
fn test_user_override_is_separate_ledger() {
    let mut storage = logged_in();
    run(&mut storage, "add Coffee 5 Food 2024-03-01").unwrap();
    assert_eq!(
        run(&mut storage, "--user bob list").unwrap(),
        "No expenses found.\n"
    );
}

#[test]
fn test_demo_mode_never_persists() {
    let mut storage = logged_in();
    let out = run(&mut storage, "--demo add Coffee 5 Food 2024-03-01").unwrap();
    assert!(out.contains("demo mode"));
    assert_eq!(run(&mut storage, "--demo list").unwrap(), "No expenses found.\n");
    assert!(store::load(&storage, &Scope::user("alice")).unwrap().expenses.is_empty());
    assert!(storage.get("expenses_demo").unwrap().is_none());
}

#[test]
fn test_demo_delete_prints_note() {
    let mut storage = MemoryStorage::new();
    let out = run(&mut storage, "--demo delete 42").unwrap();
    assert!(out.starts_with("(demo mode: changes are not saved)\n"));
    assert!(out.contains("nothing to delete"));
}

#[test]
fn test_user_named_demo_is_persisted() {
    let mut storage = MemoryStorage::new();
    run(&mut storage, "login demo secret12").unwrap();
    let out = run(&mut storage, "add Coffee 5 Food 2024-03-01").unwrap();
    assert!(!out.contains("demo mode"));
    assert!(storage.get("expenses_demo").unwrap().is_some());
    assert_eq!(run(&mut storage, "whoami").unwrap(), "demo\n");
}

#[test]
fn test_clear_requires_confirmation() {
    let mut storage = logged_in();
    run(&mut storage, "add Coffee 5 Food 2024-03-01").unwrap();
    assert!(run(&mut storage, "clear").is_err());
    run(&mut storage, "clear --yes").unwrap();
    assert!(store::load(&storage, &Scope::user("alice")).unwrap().expenses.is_empty());
}

#[test]
fn test_export_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let mut storage = logged_in();
    run(&mut storage, "add Coffee 5 Food 2024-03-01").unwrap();
    run(&mut storage, "add Bus 2 Transport 2024-03-15").unwrap();

    let out = run(&mut storage, &format!("export {} --category Food", path.display())).unwrap();
    assert!(out.starts_with("Exported 1 expenses"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "Name,Amount,Category,Date,Recurring\nCoffee,5,Food,2024-03-01,false\n");
}

#[test]
fn test_export_empty_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let mut storage = logged_in();
    let err = run(&mut storage, &format!("export {}", path.display())).unwrap_err();
    assert_eq!(err.to_string(), "No data to export");
    assert!(!path.exists());
}

// ── Misc ─────────────────────────────────────────────────────

#[test]
fn test_theme_command() {
    let mut storage = MemoryStorage::new();
    assert_eq!(run(&mut storage, "theme").unwrap(), "Theme: light-mode\n");
    assert_eq!(run(&mut storage, "theme toggle").unwrap(), "Theme: dark-mode\n");
    assert_eq!(run(&mut storage, "theme light").unwrap(), "Theme: light-mode\n");
    assert!(run(&mut storage, "theme neon").is_err());
}

#[test]
fn test_unknown_command_fails() {
    let mut storage = MemoryStorage::new();
    assert!(run(&mut storage, "frobnicate").is_err());
}

#[test]
fn test_no_command_prints_usage() {
    let mut storage = MemoryStorage::new();
    assert!(run(&mut storage, "").unwrap().starts_with("FlowSpend"));
}
