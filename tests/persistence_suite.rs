mod common;

use std::fs;

use household_ledger::{
    domain::{
        CardBalance, CompanyEntry, CompanyTax, Deductions, EntryDate, EntryKind, FixedExpense,
        MonthRecords, Salary, SubtotalTag, VariableExpenseEntry,
    },
    errors::{LedgerError, StoreError},
    storage::{JsonMonthStore, MemoryMonthStore, MonthStore},
};

use common::{month, setup_test_env, temp_base};

fn populated(raw_month: &str) -> MonthRecords {
    let key = month(raw_month);
    let mut records = MonthRecords::with_defaults(key);
    records.variable_expenses.push(VariableExpenseEntry::new(
        "Feira",
        EntryDate::from_ymd(key.year(), key.month(), 3),
        42.5,
        17.0,
    ));
    records.cards = CardBalance::new(1200.0, 830.55);
    records.company_entries.push(
        CompanyEntry::new(
            key,
            EntryKind::Revenue,
            "Consultoria",
            EntryDate::from_ymd(key.year(), key.month(), 10),
            5000.0,
        )
        .with_category(Some("Serviços"))
        .with_cost_center(Some("Matriz")),
    );
    records
        .salaries
        .push(Salary::new("Ana", 3000.0, Deductions::new(300.0, 100.0, 50.0)));
    records
}

#[test]
fn save_then_load_roundtrips() {
    let store = JsonMonthStore::new(Some(temp_base()), None).expect("store");
    let records = populated("2024-04");
    store.save_month(&records.month, &records).expect("save");
    let loaded = store.load_month(&records.month).expect("load").expect("present");
    assert_eq!(loaded, records);
}

#[test]
fn saving_twice_yields_same_state() {
    let store = JsonMonthStore::new(Some(temp_base()), None).expect("store");
    let records = populated("2024-04");
    store.save_month(&records.month, &records).expect("first save");
    let first = fs::read_to_string(store.month_path(&records.month)).expect("read");
    store.save_month(&records.month, &records).expect("second save");
    let second = fs::read_to_string(store.month_path(&records.month)).expect("read");
    assert_eq!(first, second);
    assert_eq!(store.list_months().expect("list"), vec![records.month]);
}

#[test]
fn missing_month_is_absent_not_an_error() {
    let store = JsonMonthStore::new(Some(temp_base()), None).expect("store");
    assert!(store.load_month(&month("1999-12")).expect("load").is_none());
    let memory = MemoryMonthStore::new();
    assert!(memory.load_month(&month("1999-12")).expect("load").is_none());
}

#[test]
fn backups_are_pruned_to_retention() {
    let store = JsonMonthStore::new(Some(temp_base()), Some(2)).expect("store");
    let mut records = populated("2024-06");
    for amount in [1.0, 2.0, 3.0, 4.0, 5.0] {
        records.cards = CardBalance::new(amount, amount);
        store.save_month(&records.month, &records).expect("save");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    let backups = store.list_backups(&records.month).expect("backups");
    assert_eq!(backups.len(), 2);

    let restored = store
        .restore_backup(&records.month, &backups[0])
        .expect("restore newest backup");
    assert_eq!(restored.cards, CardBalance::new(4.0, 4.0));
}

#[test]
fn stored_empty_fixed_list_keeps_defaults() {
    let (mut manager, _config, base) = setup_test_env();
    let key = month("2024-02");
    let store = JsonMonthStore::new(Some(base), Some(3)).expect("store");
    let mut stored = MonthRecords::empty(key);
    stored.cards = CardBalance::new(10.0, 20.0);
    store.save_month(&key, &stored).expect("seed store");

    let report = manager.open(key).expect("open");
    assert!(report.found);
    assert_eq!(manager.current().fixed_expenses, FixedExpense::defaults());
    assert_eq!(manager.current().cards, CardBalance::new(10.0, 20.0));
}

#[test]
fn stored_fixed_list_replaces_defaults() {
    let (mut manager, _config, base) = setup_test_env();
    let key = month("2024-02");
    let store = JsonMonthStore::new(Some(base), Some(3)).expect("store");
    let mut stored = MonthRecords::empty(key);
    stored.fixed_expenses = vec![FixedExpense::new("Rent", 1200.0).paid(true)];
    store.save_month(&key, &stored).expect("seed store");

    manager.open(key).expect("open");
    let fixed = &manager.current().fixed_expenses;
    assert_eq!(fixed.len(), 1);
    assert_eq!(fixed[0].category, "Rent");
    assert_eq!(fixed[0].amount, 1200.0);
    assert!(fixed[0].paid);
}

#[test]
fn manager_save_persists_and_reopens() {
    let (mut manager, _config, _base) = setup_test_env();
    let key = month("2024-08");
    manager.open(key).expect("open");
    manager.set_fixed_amount("Luz", 410.0).expect("set");
    manager.set_cards(CardBalance::new(300.0, 200.0));
    manager.save().expect("save");

    manager.open(month("2024-09")).expect("switch");
    assert_eq!(manager.current().cards, CardBalance::default());
    manager.open(key).expect("reopen");
    assert_eq!(manager.current().fixed_expense("Luz").map(|e| e.amount), Some(410.0));
    assert_eq!(manager.summary().personal.total_cards, 500.0);
}

#[test]
fn offline_store_failure_is_surfaced_and_retry_succeeds() {
    let store = MemoryMonthStore::new();
    let key = month("2024-10");
    let records = populated("2024-10");

    store.set_offline(true);
    let err = store.save_month(&key, &records).expect_err("offline");
    assert!(matches!(err, StoreError::Unavailable(_)));
    assert!(!err.to_string().is_empty());

    store.set_offline(false);
    store.save_month(&key, &records).expect("retry");
    assert_eq!(store.load_month(&key).expect("load"), Some(records));
}

#[test]
fn manager_keeps_edits_when_save_fails() {
    let store = MemoryMonthStore::new();
    store.set_offline(true);
    let mut manager = household_ledger::core::MonthManager::new(Box::new(store));
    let err = manager.open(month("2024-10")).expect_err("offline open");
    assert!(matches!(err, LedgerError::Store(StoreError::Unavailable(_))));

    manager.set_cards(CardBalance::new(1.0, 2.0));
    assert!(manager.save().is_err());
    assert!(manager.is_dirty());
    assert_eq!(manager.current().cards, CardBalance::new(1.0, 2.0));
}

#[test]
fn malformed_stored_values_are_coerced() {
    let store = MemoryMonthStore::new();
    let key = month("2024-11");
    store
        .insert_raw(
            key,
            r#"{
                "month": "2024-11",
                "fixed_expenses": [
                    {"category": "Combustível", "amount": "350,75", "paid": "yes"},
                    {"category": "Luz", "amount": null},
                    {"category": "Seguro", "amount": "n/a", "tag": "insurance"}
                ],
                "variable_expenses": [
                    {"description": "Feira", "date": "not a date", "share_a": "12.5"}
                ],
                "company_entries": [
                    {"id": "8c3f2b1e-7a55-4b0e-9a53-5a8f1d6c2e10", "month": "2024-11",
                     "kind": "expense", "description": "Aluguel", "date": "2024-11-05",
                     "amount": -900, "category": "  "}
                ],
                "salaries": [
                    {"employee_name": "Ana", "gross_salary": 2000, "net_salary": 99999,
                     "deductions": {"inss": 150}}
                ]
            }"#,
        )
        .expect("insert");

    let loaded = store.load_month(&key).expect("load").expect("present");
    let fixed = &loaded.fixed_expenses;
    assert_eq!(fixed[0].amount, 350.75);
    assert!(fixed[0].paid);
    assert_eq!(fixed[0].tag, SubtotalTag::CardLinked);
    assert_eq!(fixed[1].amount, 0.0);
    assert_eq!(fixed[2].amount, 0.0);
    assert_eq!(fixed[2].tag, SubtotalTag::Insurance);

    let variable = &loaded.variable_expenses[0];
    assert!(!variable.date.is_set());
    assert_eq!(variable.share_a, 12.5);
    assert_eq!(variable.share_b, 0.0);

    let entry = &loaded.company_entries[0];
    assert_eq!(entry.amount(), 900.0);
    assert_eq!(entry.category, None);

    assert_eq!(loaded.salaries[0].net_salary(), 1850.0);
}

#[test]
fn null_sections_and_unknown_kinds_still_load() {
    let store = MemoryMonthStore::new();
    let key = month("2024-11");
    store
        .insert_raw(
            key,
            r#"{
                "month": "2024-11",
                "fixed_expenses": null,
                "variable_expenses": null,
                "cards": null,
                "company_tax": null,
                "company_entries": [
                    {"month": "2024-11", "kind": "transfer", "description": "Ajuste",
                     "date": "2024-11-07", "amount": 75, "category": 42,
                     "cost_center": null, "payment_method": 7}
                ],
                "salaries": [
                    {"employee_name": "Ana", "gross_salary": 2000, "deductions": null}
                ],
                "receivables": "none"
            }"#,
        )
        .expect("insert");

    let loaded = store.load_month(&key).expect("load").expect("present");
    assert!(loaded.fixed_expenses.is_empty());
    assert!(loaded.variable_expenses.is_empty());
    assert_eq!(loaded.cards, CardBalance::default());
    assert_eq!(loaded.company_tax, CompanyTax::default());
    assert!(loaded.receivables.is_empty());

    let entry = &loaded.company_entries[0];
    assert_eq!(entry.kind, EntryKind::Expense);
    assert_eq!(entry.category.as_deref(), Some("42"));
    assert_eq!(entry.cost_center, None);
    assert_eq!(entry.payment_method.as_deref(), Some("7"));

    assert_eq!(loaded.salaries[0].deductions(), &Deductions::default());
    assert_eq!(loaded.salaries[0].net_salary(), 2000.0);

    let mut manager = household_ledger::core::MonthManager::new(Box::new(store));
    manager.open(key).expect("open month with null sections");
    assert_eq!(manager.current().fixed_expenses, FixedExpense::defaults());
    assert_eq!(manager.summary().company.total_expense, 75.0);
}
