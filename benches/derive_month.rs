use criterion::{black_box, criterion_group, criterion_main, Criterion};
use household_ledger::{
    core::services::SummaryService,
    domain::{
        CompanyEntry, Deductions, EntryDate, EntryKind, MonthKey, MonthRecords, Salary,
        VariableExpenseEntry,
    },
};

fn build_month(entry_count: usize) -> MonthRecords {
    let month = MonthKey::new(2025, 1).expect("valid month");
    let mut records = MonthRecords::with_defaults(month);
    for idx in 0..entry_count {
        let day = (idx % 28) as u32 + 1;
        let date = EntryDate::from_ymd(2025, 1, day);
        let kind = if idx % 4 == 0 {
            EntryKind::Revenue
        } else {
            EntryKind::Expense
        };
        records.company_entries.push(
            CompanyEntry::new(month, kind, format!("line {idx}"), date, 50.0 + (idx % 100) as f64)
                .with_category(Some(&format!("category {}", idx % 12))),
        );
        if idx % 10 == 0 {
            records
                .variable_expenses
                .push(VariableExpenseEntry::new("extra", date, 12.5, 7.5));
        }
    }
    for idx in 0..20 {
        records.salaries.push(Salary::new(
            format!("employee {idx}"),
            3000.0 + idx as f64 * 100.0,
            Deductions::new(300.0, 120.0, 15.0),
        ));
    }
    records
}

fn bench_derive(c: &mut Criterion) {
    let records = build_month(black_box(5_000));

    c.bench_function("derive_month_5k", |b| {
        b.iter(|| SummaryService::derive(black_box(&records)))
    });

    c.bench_function("company_projections_5k", |b| {
        b.iter(|| SummaryService::company_projections(black_box(&records.company_entries)))
    });
}

criterion_group!(benches, bench_derive);
criterion_main!(benches);
