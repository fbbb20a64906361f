use uuid::Uuid;

use crate::{
    cli::{
        context::{CliMode, CommandError, CommandResult, ShellContext},
        help, output,
        registry::{CommandEntry, CommandRegistry},
        report,
    },
    core::services::{PersonalService, DEFAULT_TOP_FIXED},
    domain::{
        is_truthy_word, CardBalance, CompanyEntry, CompanyReceivable, CompanyTax, Deductions, EntryDate,
        EntryKind, FixedExpense, Identifiable, MonthKey, Salary, SubtotalTag,
        VariableExpenseEntry,
    },
    errors::LedgerError,
    utils::build_info,
};

pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in [
        CommandEntry::new("month", "Show or switch the open month", "month [YYYY-MM]", cmd_month),
        CommandEntry::new(
            "show",
            "Print derived totals",
            "show [personal|company|payroll|all]",
            cmd_show,
        ),
        CommandEntry::new(
            "fixed",
            "List or edit fixed expenses",
            "fixed list | fixed top [n] | fixed set <category> <amount> | fixed paid <category> [yes|no] | fixed add <category> <amount> [card|insurance]",
            cmd_fixed,
        ),
        CommandEntry::new("card", "Set both credit card balances", "card <party-a> <party-b>", cmd_card),
        CommandEntry::new(
            "extra",
            "List or edit variable expenses",
            "extra list | extra add <description> <YYYY-MM-DD> <share-a> <share-b> | extra remove <n>",
            cmd_extra,
        ),
        CommandEntry::new(
            "entry",
            "List or edit company entries",
            "entry list | entry add <revenue|expense> <amount> <YYYY-MM-DD> <description> [category] [cost-center] | entry remove <n>",
            cmd_entry,
        ),
        CommandEntry::new(
            "salary",
            "List or edit salaries",
            "salary list | salary add <name> <gross> [inss] [irrf] [other] | salary update <n> <gross> [inss] [irrf] [other] | salary paid <n> [yes|no] | salary remove <n>",
            cmd_salary,
        ),
        CommandEntry::new(
            "receivable",
            "List or edit company receivables",
            "receivable list | receivable add <description> <amount> [YYYY-MM-DD] | receivable received <n> [yes|no] | receivable remove <n>",
            cmd_receivable,
        ),
        CommandEntry::new(
            "tax",
            "Show or set the company INSS",
            "tax [<amount> [YYYY-MM-DD] [paid]]",
            cmd_tax,
        ),
        CommandEntry::new("save", "Persist the open month", "save", cmd_save),
        CommandEntry::new("months", "List months with stored data", "months", cmd_months),
        CommandEntry::new("backups", "List snapshots of the open month", "backups", cmd_backups),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ] {
        registry.register(entry);
    }
    registry
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        output::info(format!(
            "Open month: {} ({} store)",
            context.manager.month(),
            context.manager.storage().backend_name()
        ));
        return Ok(());
    };
    let month: MonthKey = raw.parse()?;
    if context.manager.is_dirty() {
        output::warning(format!(
            "Discarding unsaved changes to {}.",
            context.manager.month()
        ));
    }
    let opened = context.manager.open(month)?;
    context.remember_month()?;
    if opened.found {
        output::success(format!("Loaded {month}."));
    } else {
        output::info(format!("No data stored for {month}; starting from defaults."));
    }
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let section = args.first().map(|s| s.to_ascii_lowercase());
    let summary = context.manager.summary();
    let format = &context.format;
    let personal = || {
        report::personal_report(
            &summary.personal,
            format,
            &context.config.party_a,
            &context.config.party_b,
        )
    };
    let company = || {
        report::company_report(
            &summary.company,
            &summary.investment_goal,
            &context.manager.projections(),
            format,
        )
    };
    let payroll = || report::payroll_report(&summary.payroll, format);

    match section.as_deref() {
        None | Some("all") => {
            output::section(format!("Summary {}", summary.month));
            output::block(personal());
            output::block(company());
            output::block(payroll());
        }
        Some("personal") => output::block(personal()),
        Some("company") => output::block(company()),
        Some("payroll") => output::block(payroll()),
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown section `{other}`, expected personal, company, payroll or all"
            )))
        }
    }
    Ok(())
}

fn cmd_fixed(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args) {
        "list" => {
            output::block(report::fixed_table(
                &context.manager.current().fixed_expenses,
                &context.format,
            ));
        }
        "top" => {
            let limit = match args.get(1) {
                Some(raw) => raw.parse::<usize>().map_err(|_| {
                    CommandError::InvalidArguments(format!("`{raw}` is not a count"))
                })?,
                None => DEFAULT_TOP_FIXED,
            };
            let top = PersonalService::top_fixed(&context.manager.current().fixed_expenses, limit);
            for row in top {
                output::info(format!("  {:<24}{}", row.name, context.format.format(row.amount)));
            }
        }
        "set" => {
            let category = arg(args, 1, "category")?;
            let amount = parse_money(arg(args, 2, "amount")?)?;
            context.manager.set_fixed_amount(category, amount)?;
            output::success(format!("{category} set to {}.", context.format.format(amount)));
        }
        "paid" => {
            let category = arg(args, 1, "category")?;
            let paid = parse_flag(args.get(2).copied())?;
            context.manager.set_fixed_paid(category, paid)?;
            output::success(format!("{category} marked {}.", paid_label(paid)));
        }
        "add" => {
            let category = arg(args, 1, "category")?;
            let amount = parse_money(arg(args, 2, "amount")?)?;
            let mut expense = FixedExpense::new(category, amount);
            if let Some(raw) = args.get(3) {
                expense = expense.with_tag(parse_tag(raw)?);
            }
            context.manager.add_fixed_expense(expense)?;
            output::success(format!("Added fixed expense {category}."));
        }
        other => return Err(unknown_subcommand("fixed", other)),
    }
    Ok(())
}

fn cmd_card(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let owner_a = parse_money(arg(args, 0, "party A balance")?)?;
    let owner_b = parse_money(arg(args, 1, "party B balance")?)?;
    context.manager.set_cards(CardBalance::new(owner_a, owner_b));
    output::success("Card balances updated.");
    Ok(())
}

fn cmd_extra(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args) {
        "list" => output::block(report::variable_table(
            &context.manager.current().variable_expenses,
            &context.format,
        )),
        "add" => {
            let description = arg(args, 1, "description")?;
            let date = parse_date(arg(args, 2, "date")?)?;
            let share_a = parse_money(arg(args, 3, "party A share")?)?;
            let share_b = parse_money(arg(args, 4, "party B share")?)?;
            let position = context.manager.add_variable(VariableExpenseEntry::new(
                description,
                date,
                share_a,
                share_b,
            ));
            output::success(format!("Added variable expense #{}.", position + 1));
        }
        "remove" => {
            let index = parse_position(
                arg(args, 1, "entry number")?,
                context.manager.current().variable_expenses.len(),
            )?;
            let removed = context.manager.remove_variable(index)?;
            output::success(format!("Removed {}.", removed.description));
        }
        other => return Err(unknown_subcommand("extra", other)),
    }
    Ok(())
}

fn cmd_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args) {
        "list" => output::block(report::company_table(
            &context.manager.current().company_entries,
            &context.format,
        )),
        "add" => {
            let kind: EntryKind = arg(args, 1, "kind")?.parse()?;
            let amount = parse_money(arg(args, 2, "amount")?)?;
            let date = parse_date(arg(args, 3, "date")?)?;
            let description = arg(args, 4, "description")?;
            let entry = CompanyEntry::new(context.manager.month(), kind, description, date, amount)
                .with_category(args.get(5).copied())
                .with_cost_center(args.get(6).copied());
            context.manager.add_company_entry(entry)?;
            output::success(format!("Added {kind} {}.", context.format.format(amount)));
        }
        "remove" => {
            let id = id_at(&context.manager.current().company_entries, arg(args, 1, "entry number")?)?;
            let removed = context.manager.remove_company_entry(id)?;
            output::success(format!("Removed {}.", removed.description));
        }
        other => return Err(unknown_subcommand("entry", other)),
    }
    Ok(())
}

fn cmd_salary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args) {
        "list" => output::block(report::salary_table(
            &context.manager.current().salaries,
            &context.manager.summary().payroll,
            &context.format,
        )),
        "add" => {
            let name = arg(args, 1, "employee name")?;
            let gross = parse_money(arg(args, 2, "gross salary")?)?;
            let deductions = parse_deductions(&args[3..])?;
            let salary = Salary::new(name, gross, deductions);
            let net = salary.net_salary();
            context.manager.add_salary(salary);
            output::success(format!("Added {name}, net {}.", context.format.format(net)));
        }
        "update" => {
            let id = id_at(&context.manager.current().salaries, arg(args, 1, "salary number")?)?;
            let gross = parse_money(arg(args, 2, "gross salary")?)?;
            let deductions = if args.len() > 3 {
                Some(parse_deductions(&args[3..])?)
            } else {
                None
            };
            let net = context.manager.update_salary(id, Some(gross), deductions)?;
            output::success(format!("Salary updated, net {}.", context.format.format(net)));
        }
        "paid" => {
            let id = id_at(&context.manager.current().salaries, arg(args, 1, "salary number")?)?;
            let paid = parse_flag(args.get(2).copied())?;
            context.manager.set_salary_paid(id, paid)?;
            output::success(format!("Salary marked {}.", paid_label(paid)));
        }
        "remove" => {
            let id = id_at(&context.manager.current().salaries, arg(args, 1, "salary number")?)?;
            let removed = context.manager.remove_salary(id)?;
            output::success(format!("Removed {}.", removed.employee_name));
        }
        other => return Err(unknown_subcommand("salary", other)),
    }
    Ok(())
}

fn cmd_receivable(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match subcommand(args) {
        "list" => output::block(report::receivable_table(
            &context.manager.current().receivables,
            &context.format,
        )),
        "add" => {
            let description = arg(args, 1, "description")?;
            let amount = parse_money(arg(args, 2, "amount")?)?;
            let due_date = match args.get(3) {
                Some(raw) => parse_date(raw)?,
                None => EntryDate::unset(),
            };
            context
                .manager
                .add_receivable(CompanyReceivable::new(description, amount, due_date));
            output::success(format!("Added receivable {description}."));
        }
        "received" => {
            let id = id_at(&context.manager.current().receivables, arg(args, 1, "receivable number")?)?;
            let received = parse_flag(args.get(2).copied())?;
            context.manager.set_receivable_received(id, received)?;
            output::success("Receivable updated.");
        }
        "remove" => {
            let id = id_at(&context.manager.current().receivables, arg(args, 1, "receivable number")?)?;
            let removed = context.manager.remove_receivable(id)?;
            output::success(format!("Removed {}.", removed.description));
        }
        other => return Err(unknown_subcommand("receivable", other)),
    }
    Ok(())
}

fn cmd_tax(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        output::info(report::tax_line(&context.manager.current().company_tax, &context.format));
        return Ok(());
    }
    let amount = parse_money(args[0])?;
    let due_date = match args.get(1) {
        Some(raw) => parse_date(raw)?,
        None => context.manager.current().company_tax.due_date,
    };
    let paid = args
        .get(2)
        .map(|raw| parse_flag(Some(*raw)))
        .transpose()?
        .unwrap_or(false);
    context.manager.set_company_tax(CompanyTax {
        amount,
        due_date,
        paid,
    });
    output::success(format!("Company tax set to {}.", context.format.format(amount)));
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.manager.save()?;
    context.remember_month()?;
    output::success(format!(
        "Saved {} to the {} store.",
        context.manager.month(),
        context.manager.storage().backend_name()
    ));
    Ok(())
}

fn cmd_months(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let months = context
        .manager
        .storage()
        .list_months()
        .map_err(LedgerError::from)?;
    if months.is_empty() {
        output::info("No months stored yet.");
    }
    for month in months {
        output::info(format!("  {month}"));
    }
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let month = context.manager.month();
    let backups = context
        .manager
        .storage()
        .list_backups(&month)
        .map_err(LedgerError::from)?;
    if backups.is_empty() {
        output::info(format!("No backups for {month}."));
    }
    for name in backups {
        output::info(format!("  {name}"));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => help::print_overview(&context.registry),
        Some(name) => match context.registry.get(&name.to_ascii_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        },
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(build_info::current().describe());
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode == CliMode::Interactive && context.manager.is_dirty() {
        output::warning("Leaving with unsaved changes.");
    }
    output::info("Exiting shell.");
    Err(CommandError::ExitRequested)
}

fn subcommand<'a>(args: &[&'a str]) -> &'a str {
    args.first().copied().unwrap_or("list")
}

fn arg<'a>(args: &[&'a str], idx: usize, name: &str) -> Result<&'a str, CommandError> {
    args.get(idx)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("missing {name}")))
}

fn unknown_subcommand(command: &str, sub: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown `{command}` action `{sub}`"))
}

/// Strict amount parsing for typed input; `,` is accepted as decimal mark.
pub(crate) fn parse_money(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not an amount")))
}

fn parse_date(raw: &str) -> Result<EntryDate, CommandError> {
    let date = EntryDate::parse(raw);
    if date.is_set() {
        Ok(date)
    } else {
        Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not a date, expected YYYY-MM-DD"
        )))
    }
}

fn parse_flag(raw: Option<&str>) -> Result<bool, CommandError> {
    match raw.map(|value| value.to_lowercase()).as_deref() {
        None => Ok(true),
        Some(word) if is_truthy_word(word) => Ok(true),
        Some("no") | Some("n") | Some("false") | Some("unpaid") | Some("nao") => Ok(false),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not yes or no"
        ))),
    }
}

fn parse_tag(raw: &str) -> Result<SubtotalTag, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "card" | "card-linked" => Ok(SubtotalTag::CardLinked),
        "insurance" => Ok(SubtotalTag::Insurance),
        "none" => Ok(SubtotalTag::Untagged),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown tag `{other}`, expected card, insurance or none"
        ))),
    }
}

fn parse_deductions(args: &[&str]) -> Result<Deductions, CommandError> {
    let value = |idx: usize| -> Result<f64, CommandError> {
        args.get(idx).map(|raw| parse_money(raw)).transpose().map(Option::unwrap_or_default)
    };
    Ok(Deductions::new(value(0)?, value(1)?, value(2)?))
}

/// Converts a 1-based list position into an index.
fn parse_position(raw: &str, len: usize) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(position) if position >= 1 && position <= len => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not a position between 1 and {len}"
        ))),
    }
}

fn id_at<T: Identifiable>(items: &[T], raw: &str) -> Result<Uuid, CommandError> {
    let index = parse_position(raw, items.len())?;
    Ok(items[index].id())
}

fn paid_label(paid: bool) -> &'static str {
    if paid {
        "paid"
    } else {
        "unpaid"
    }
}
