use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    core::{
        registry::DimensionRegistry,
        services::{CompanyProjections, MonthSummary, SummaryService},
    },
    domain::{
        amount_or_zero, CardBalance, CompanyEntry, CompanyReceivable, CompanyTax, Deductions,
        FixedExpense, Identifiable, MonthKey, MonthRecords, Salary, VariableExpenseEntry,
    },
    errors::{LedgerError, Result},
    storage::MonthStore,
};

/// Outcome of opening a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenReport {
    pub month: MonthKey,
    /// False when the store had nothing and the month starts from defaults.
    pub found: bool,
}

/// Facade that holds the month being edited, applies edits to its raw
/// records and persists it through the configured store.
pub struct MonthManager {
    current: MonthRecords,
    registry: DimensionRegistry,
    storage: Box<dyn MonthStore>,
    dirty: bool,
}

impl MonthManager {
    pub fn new(storage: Box<dyn MonthStore>) -> Self {
        Self {
            current: MonthRecords::with_defaults(MonthKey::current()),
            registry: DimensionRegistry::default(),
            storage,
            dirty: false,
        }
    }

    pub fn storage(&self) -> &dyn MonthStore {
        self.storage.as_ref()
    }

    pub fn current(&self) -> &MonthRecords {
        &self.current
    }

    pub fn month(&self) -> MonthKey {
        self.current.month
    }

    pub fn registry(&self) -> &DimensionRegistry {
        &self.registry
    }

    /// True when there are edits that have not been saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Switches to `month`: seeds defaults, then layers whatever the store
    /// has on top. Unsaved edits to the previous month are discarded.
    pub fn open(&mut self, month: MonthKey) -> Result<OpenReport> {
        let mut records = MonthRecords::with_defaults(month);
        let loaded = self.storage.load_month(&month).map_err(|err| {
            warn!(%month, backend = self.storage.backend_name(), error = %err, "failed to load month");
            LedgerError::from(err)
        })?;
        let found = loaded.is_some();
        if let Some(loaded) = loaded {
            records.apply_loaded(loaded);
        }
        self.registry = self.storage.load_dimensions()?;
        self.current = records;
        self.dirty = false;
        info!(%month, found, backend = self.storage.backend_name(), "month opened");
        Ok(OpenReport { month, found })
    }

    /// Persists the current month. Failures are returned untouched so the
    /// caller can offer a retry; nothing is retried here.
    pub fn save(&mut self) -> Result<()> {
        let month = self.current.month;
        // New names only join the registry once the store has them.
        let mut registry = self.registry.clone();
        if registry.register_all(&self.current.company_entries) > 0 {
            if let Err(err) = self.storage.save_dimensions(&registry) {
                warn!(%month, backend = self.storage.backend_name(), error = %err, "failed to save dimensions");
                return Err(err.into());
            }
            self.registry = registry;
        }
        if let Err(err) = self.storage.save_month(&month, &self.current) {
            warn!(%month, backend = self.storage.backend_name(), error = %err, "failed to save month");
            return Err(err.into());
        }
        self.dirty = false;
        info!(%month, backend = self.storage.backend_name(), "month saved");
        Ok(())
    }

    pub fn summary(&self) -> MonthSummary {
        SummaryService::derive(&self.current)
    }

    pub fn projections(&self) -> CompanyProjections {
        SummaryService::company_projections(&self.current.company_entries)
    }

    pub fn set_fixed_amount(&mut self, category: &str, amount: f64) -> Result<()> {
        let expense = self.fixed_mut(category)?;
        expense.amount = amount_or_zero(amount);
        self.touch();
        Ok(())
    }

    pub fn set_fixed_paid(&mut self, category: &str, paid: bool) -> Result<()> {
        self.fixed_mut(category)?.paid = paid;
        self.touch();
        Ok(())
    }

    pub fn add_fixed_expense(&mut self, expense: FixedExpense) -> Result<()> {
        let category = expense.category.trim();
        if category.is_empty() {
            return Err(LedgerError::Invalid("fixed expense category is required".into()));
        }
        if self.current.fixed_expense(category).is_some() {
            return Err(LedgerError::Invalid(format!(
                "fixed expense `{category}` already exists"
            )));
        }
        let expense = FixedExpense {
            category: category.to_string(),
            ..expense
        };
        self.current.fixed_expenses.push(expense);
        self.touch();
        Ok(())
    }

    /// Appends an entry and returns its position.
    pub fn add_variable(&mut self, entry: VariableExpenseEntry) -> usize {
        self.current.variable_expenses.push(entry);
        self.touch();
        self.current.variable_expenses.len() - 1
    }

    pub fn remove_variable(&mut self, index: usize) -> Result<VariableExpenseEntry> {
        if index >= self.current.variable_expenses.len() {
            return Err(LedgerError::NotFound(format!("variable expense #{}", index + 1)));
        }
        let removed = self.current.variable_expenses.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn set_cards(&mut self, cards: CardBalance) {
        self.current.cards = CardBalance::new(amount_or_zero(cards.owner_a), amount_or_zero(cards.owner_b));
        self.touch();
    }

    /// Adds a company entry after checking description, date and a positive
    /// amount. The entry must belong to the open month.
    pub fn add_company_entry(&mut self, entry: CompanyEntry) -> Result<Uuid> {
        if entry.description.trim().is_empty() {
            return Err(LedgerError::Invalid("description is required".into()));
        }
        if !entry.date.is_set() {
            return Err(LedgerError::Invalid("date is required".into()));
        }
        if entry.amount() <= 0.0 {
            return Err(LedgerError::Invalid("amount must be greater than zero".into()));
        }
        if entry.month != self.current.month {
            return Err(LedgerError::Invalid(format!(
                "entry belongs to {} but {} is open",
                entry.month, self.current.month
            )));
        }
        let id = entry.id;
        self.current.company_entries.push(entry);
        self.touch();
        Ok(id)
    }

    pub fn remove_company_entry(&mut self, id: Uuid) -> Result<CompanyEntry> {
        let removed = remove_by_id(&mut self.current.company_entries, id, "company entry")?;
        self.touch();
        Ok(removed)
    }

    pub fn add_salary(&mut self, salary: Salary) -> Uuid {
        let id = salary.id;
        self.current.salaries.push(salary);
        self.touch();
        id
    }

    /// Changes gross pay and/or deductions and returns the recomputed net.
    pub fn update_salary(
        &mut self,
        id: Uuid,
        gross: Option<f64>,
        deductions: Option<Deductions>,
    ) -> Result<f64> {
        let salary = find_by_id_mut(&mut self.current.salaries, id, "salary")?;
        if let Some(gross) = gross {
            salary.set_gross_salary(gross);
        }
        if let Some(deductions) = deductions {
            salary.set_deductions(deductions);
        }
        let net = salary.net_salary();
        self.touch();
        Ok(net)
    }

    pub fn set_salary_paid(&mut self, id: Uuid, paid: bool) -> Result<()> {
        find_by_id_mut(&mut self.current.salaries, id, "salary")?.paid = paid;
        self.touch();
        Ok(())
    }

    pub fn remove_salary(&mut self, id: Uuid) -> Result<Salary> {
        let removed = remove_by_id(&mut self.current.salaries, id, "salary")?;
        self.touch();
        Ok(removed)
    }

    pub fn add_receivable(&mut self, receivable: CompanyReceivable) -> Uuid {
        let id = receivable.id;
        self.current.receivables.push(receivable);
        self.touch();
        id
    }

    pub fn set_receivable_received(&mut self, id: Uuid, received: bool) -> Result<()> {
        find_by_id_mut(&mut self.current.receivables, id, "receivable")?.received = received;
        self.touch();
        Ok(())
    }

    pub fn remove_receivable(&mut self, id: Uuid) -> Result<CompanyReceivable> {
        let removed = remove_by_id(&mut self.current.receivables, id, "receivable")?;
        self.touch();
        Ok(removed)
    }

    pub fn set_company_tax(&mut self, tax: CompanyTax) {
        self.current.company_tax = CompanyTax {
            amount: amount_or_zero(tax.amount),
            ..tax
        };
        self.touch();
    }

    fn fixed_mut(&mut self, category: &str) -> Result<&mut FixedExpense> {
        self.current
            .fixed_expense_mut(category)
            .ok_or_else(|| LedgerError::NotFound(format!("fixed expense `{category}`")))
    }

    fn touch(&mut self) {
        self.dirty = true;
    }
}

fn find_by_id_mut<'a, T: Identifiable>(items: &'a mut [T], id: Uuid, label: &str) -> Result<&'a mut T> {
    items
        .iter_mut()
        .find(|item| item.id() == id)
        .ok_or_else(|| LedgerError::NotFound(format!("{label} {id}")))
}

fn remove_by_id<T: Identifiable>(items: &mut Vec<T>, id: Uuid, label: &str) -> Result<T> {
    let index = items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| LedgerError::NotFound(format!("{label} {id}")))?;
    Ok(items.remove(index))
}
