use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

use super::Invocation;
use crate::ledger::{self, BudgetStatus, ExpenseFilter};
use crate::models::{Category, ExpenseDraft, Scope};
use crate::session::{self, Theme};
use crate::store::{ExpenseStore, KeyValueStorage};
use crate::util::{format_amount, parse_amount, truncate};

/// Flags that take a value; their values are not positional arguments.
const VALUE_FLAGS: &[&str] = &["--category", "--month"];

pub(crate) fn as_cli<S: KeyValueStorage>(
    inv: &Invocation,
    storage: &mut S,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(command) = inv.command.first() else {
        print_usage(out)?;
        return Ok(());
    };
    let args = &inv.command[1..];
    info!(command = command.as_str(), "running command");

    match command.as_str() {
        "login" => cli_login(args, storage, out),
        "signup" => cli_signup(args, storage, out),
        "logout" => {
            session::logout(storage)?;
            writeln!(out, "Logged out")?;
            Ok(())
        }
        "whoami" => cli_whoami(inv, storage, out),
        "add" => cli_add(inv, args, storage, out),
        "edit" => cli_edit(inv, args, storage, out),
        "delete" | "rm" => cli_delete(inv, args, storage, out),
        "list" | "ls" => cli_list(inv, args, storage, out),
        "summary" | "s" => cli_summary(inv, storage, out),
        "budget" => cli_budget(inv, args, storage, out),
        "export" => cli_export(inv, args, storage, out),
        "theme" => cli_theme(args, storage, out),
        "clear" => cli_clear(inv, args, storage, out),
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "flowspend {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut dyn Write) -> Result<()> {
    let lines = [
        "FlowSpend — local-only personal expense tracker",
        "",
        "Usage: flowspend [--db <path>] [--user <name> | --demo] <command>",
        "",
        "Commands:",
        "  login <user> <password>                     Start a session",
        "  signup <user> <password> <confirm>          Create a user and start a session",
        "  logout                                      End the session",
        "  whoami                                      Show the active user",
        "  add <name> <amount> <category> [date]       Add an expense (date defaults to today)",
        "    --recurring                               Mark as recurring",
        "  edit <id> <name> <amount> <category> <date> Replace an expense",
        "    --recurring                               Mark as recurring",
        "  delete <id>                                 Delete an expense",
        "  list                                        List expenses, newest first",
        "    --category <name|All>                     Filter by category",
        "    --month <YYYY-MM>                         Filter by month",
        "  summary                                     Totals, budget status and breakdowns",
        "  budget [amount]                             Show or set the monthly budget",
        "  export [path]                               Export expenses to CSV",
        "    --category, --month                       Export only matching expenses",
        "  theme [light-mode|dark-mode|toggle]         Show or set the theme",
        "  clear --yes                                 Delete all data for the active user",
        "  help, version",
    ];
    for line in lines {
        writeln!(out, "{line}")?;
    }
    let categories: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
    writeln!(out)?;
    writeln!(out, "Categories: {}", categories.join(", "))?;
    Ok(())
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn positionals(args: &[String]) -> Vec<&str> {
    let mut result = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            result.push(arg.as_str());
        }
    }
    result
}

fn parse_id(raw: Option<&&str>) -> Result<i64> {
    let raw = raw.ok_or_else(|| anyhow::anyhow!("Missing expense id"))?;
    raw.parse::<i64>()
        .with_context(|| format!("Invalid expense id: {raw}"))
}

fn parse_filter(args: &[String]) -> Result<ExpenseFilter> {
    Ok(ExpenseFilter::parse(
        flag_value(args, "--category").unwrap_or("All"),
        flag_value(args, "--month").unwrap_or(""),
    )?)
}

fn open_store<'s, S: KeyValueStorage>(
    inv: &Invocation,
    storage: &'s mut S,
) -> Result<ExpenseStore<&'s mut S>> {
    let scope = session::resolve_scope(&*storage, inv.demo, inv.user.as_deref())?;
    Ok(ExpenseStore::open(storage, scope)?)
}

fn demo_note(scope: &Scope, out: &mut dyn Write) -> Result<()> {
    if scope.is_demo() {
        writeln!(out, "(demo mode: changes are not saved)")?;
    }
    Ok(())
}

// ── Session commands ─────────────────────────────────────────

fn cli_login<S: KeyValueStorage>(args: &[String], storage: &mut S, out: &mut dyn Write) -> Result<()> {
    let pos = positionals(args);
    let (Some(user), Some(password)) = (pos.first(), pos.get(1)) else {
        anyhow::bail!("Usage: flowspend login <username> <password>");
    };
    let scope = session::login(storage, user, password)?;
    writeln!(out, "Logged in as {scope}")?;
    Ok(())
}

fn cli_signup<S: KeyValueStorage>(args: &[String], storage: &mut S, out: &mut dyn Write) -> Result<()> {
    let pos = positionals(args);
    let (Some(user), Some(password), Some(confirm)) = (pos.first(), pos.get(1), pos.get(2)) else {
        anyhow::bail!("Usage: flowspend signup <username> <password> <confirm>");
    };
    let scope = session::signup(storage, user, password, confirm)?;
    writeln!(out, "Welcome, {scope}! Logged in.")?;
    Ok(())
}

fn cli_whoami<S: KeyValueStorage>(inv: &Invocation, storage: &mut S, out: &mut dyn Write) -> Result<()> {
    match session::resolve_scope(&*storage, inv.demo, inv.user.as_deref()) {
        Ok(Scope::Demo) => writeln!(out, "Demo User")?,
        Ok(scope) => writeln!(out, "{scope}")?,
        Err(session::SessionError::NotLoggedIn) => writeln!(out, "Not logged in")?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn cli_theme<S: KeyValueStorage>(args: &[String], storage: &mut S, out: &mut dyn Write) -> Result<()> {
    let theme = match args.first().map(String::as_str) {
        None => session::theme(&*storage)?,
        Some("toggle") => {
            let next = session::theme(&*storage)?.toggled();
            session::set_theme(storage, next)?;
            next
        }
        Some(raw) => {
            let theme = Theme::parse(raw)
                .ok_or_else(|| anyhow::anyhow!("Unknown theme: {raw} (use light-mode or dark-mode)"))?;
            session::set_theme(storage, theme)?;
            theme
        }
    };
    writeln!(out, "Theme: {}", theme.as_str())?;
    Ok(())
}

// ── Ledger commands ──────────────────────────────────────────

fn cli_add<S: KeyValueStorage>(
    inv: &Invocation,
    args: &[String],
    storage: &mut S,
    out: &mut dyn Write,
) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 3 {
        anyhow::bail!("Usage: flowspend add <name> <amount> <category> [YYYY-MM-DD] [--recurring]");
    }
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let date = pos.get(3).copied().unwrap_or(today.as_str());
    let draft = ExpenseDraft::parse(pos[0], pos[1], pos[2], date, has_flag(args, "--recurring"))?;

    let mut store = open_store(inv, storage)?;
    let expense = store.add(draft)?;
    demo_note(store.scope(), out)?;
    writeln!(
        out,
        "Expense added! #{} {} {} ({})",
        expense.id,
        expense.name,
        format_amount(expense.amount),
        expense.category
    )?;
    Ok(())
}

fn cli_edit<S: KeyValueStorage>(
    inv: &Invocation,
    args: &[String],
    storage: &mut S,
    out: &mut dyn Write,
) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 5 {
        anyhow::bail!(
            "Usage: flowspend edit <id> <name> <amount> <category> <YYYY-MM-DD> [--recurring]"
        );
    }
    let id = parse_id(pos.first())?;
    let draft = ExpenseDraft::parse(pos[1], pos[2], pos[3], pos[4], has_flag(args, "--recurring"))?;

    let mut store = open_store(inv, storage)?;
    let expense = store.update(id, draft)?;
    demo_note(store.scope(), out)?;
    writeln!(out, "Expense updated! #{} {}", expense.id, expense.name)?;
    Ok(())
}

fn cli_delete<S: KeyValueStorage>(
    inv: &Invocation,
    args: &[String],
    storage: &mut S,
    out: &mut dyn Write,
) -> Result<()> {
    let pos = positionals(args);
    let id = parse_id(pos.first())?;
    let mut store = open_store(inv, storage)?;
    let name = ledger::find_expense(store.expenses(), id).map(|e| e.name.clone());
    let removed = store.delete(id)?;
    demo_note(store.scope(), out)?;
    if removed {
        writeln!(out, "Expense deleted: {}", name.unwrap_or_default())?;
    } else {
        writeln!(out, "No expense #{id}; nothing to delete")?;
    }
    Ok(())
}

fn cli_list<S: KeyValueStorage>(
    inv: &Invocation,
    args: &[String],
    storage: &mut S,
    out: &mut dyn Write,
) -> Result<()> {
    let filter = parse_filter(args)?;
    let store = open_store(inv, storage)?;
    let rows = ledger::sort_by_date_descending(&ledger::filter(store.expenses(), &filter));

    if rows.is_empty() {
        writeln!(out, "No expenses found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<14} {:<24} {:>12}  {:<16} {:<10} Recurring",
        "ID", "Name", "Amount", "Category", "Date"
    )?;
    writeln!(out, "{}", "─".repeat(90))?;
    for e in &rows {
        writeln!(
            out,
            "{:<14} {:<24} {:>12}  {} {:<13} {:<10} {}",
            e.id,
            truncate(&e.name, 24),
            format_amount(e.amount),
            e.category.icon(),
            e.category.as_str(),
            e.date.format("%Y-%m-%d"),
            if e.is_recurring { "🔄" } else { "-" },
        )?;
    }
    if !filter.is_empty() {
        writeln!(out, "Found {} matching expenses", rows.len())?;
    }
    Ok(())
}

fn cli_summary<S: KeyValueStorage>(inv: &Invocation, storage: &mut S, out: &mut dyn Write) -> Result<()> {
    let store = open_store(inv, storage)?;
    let totals = ledger::compute_totals(store.expenses(), store.budget());

    let who = match store.scope() {
        Scope::Demo => "Demo User".to_string(),
        scope => scope.to_string(),
    };
    writeln!(out, "FlowSpend — {who}")?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Total:      {}", format_amount(totals.total))?;
    writeln!(out, "  Budget:     {}", format_amount(store.budget()))?;
    writeln!(out, "  Remaining:  {}", format_amount(totals.remaining))?;
    writeln!(out, "  Expenses:   {}", totals.count)?;

    match ledger::budget_status(totals.total, store.budget()) {
        BudgetStatus::Unset => {}
        BudgetStatus::Within(percent) => writeln!(out, "  Spending: {percent}% used.")?,
        BudgetStatus::Over(excess) => {
            writeln!(out, "  OVER BUDGET! By {}", format_amount(excess))?
        }
    }

    let by_category = ledger::aggregate_by_category(store.expenses());
    if !by_category.is_empty() {
        writeln!(out)?;
        writeln!(out, "Spending by Category:")?;
        for (category, amount) in &by_category {
            writeln!(
                out,
                "  {} {:<16} {}",
                category.icon(),
                category.as_str(),
                format_amount(*amount)
            )?;
        }
    }

    let by_month = ledger::aggregate_by_month(store.expenses());
    if !by_month.is_empty() {
        writeln!(out)?;
        writeln!(out, "Monthly Trend:")?;
        for (month, amount) in &by_month {
            writeln!(out, "  {:<8} {}", month.label(), format_amount(*amount))?;
        }
    }
    Ok(())
}

fn cli_budget<S: KeyValueStorage>(
    inv: &Invocation,
    args: &[String],
    storage: &mut S,
    out: &mut dyn Write,
) -> Result<()> {
    let mut store = open_store(inv, storage)?;
    match positionals(args).first() {
        None => {
            if store.budget().is_zero() {
                writeln!(out, "No budget set")?;
            } else {
                writeln!(out, "Budget: {}", format_amount(store.budget()))?;
            }
        }
        Some(raw) => {
            let amount = parse_amount(raw).context("Invalid budget amount")?;
            store.set_budget(amount)?;
            demo_note(store.scope(), out)?;
            writeln!(out, "Budget set! {}", format_amount(amount))?;
        }
    }
    Ok(())
}

fn cli_export<S: KeyValueStorage>(
    inv: &Invocation,
    args: &[String],
    storage: &mut S,
    out: &mut dyn Write,
) -> Result<()> {
    let filter = parse_filter(args)?;
    let store = open_store(inv, storage)?;
    let rows = ledger::filter(store.expenses(), &filter);

    let output_path = positionals(args)
        .first()
        .map(|p| crate::config::shellexpand(p))
        .unwrap_or_else(|| {
            crate::export::default_file_name(chrono::Local::now().date_naive())
        });

    let count = crate::export::export_to_file(Path::new(&output_path), &rows)?;
    writeln!(out, "Exported {count} expenses to {output_path}")?;
    Ok(())
}

fn cli_clear<S: KeyValueStorage>(
    inv: &Invocation,
    args: &[String],
    storage: &mut S,
    out: &mut dyn Write,
) -> Result<()> {
    if !has_flag(args, "--yes") {
        anyhow::bail!("Refusing to clear without --yes");
    }
    let mut store = open_store(inv, storage)?;
    store.clear()?;
    writeln!(out, "Cleared all expenses and the budget for {}", store.scope())?;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
