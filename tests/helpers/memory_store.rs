//! In-memory store implementations
//!
//! Each store keeps its rows in a `Vec` behind a mutex and counts the writes
//! it receives, so tests can assert that a no-op really wrote nothing.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use kindergarten_office::database::{
    AdminStore, AttendanceStore, AuditStore, BillingStore, ChildStore, DatabaseService, DebtStore, FoodCostStore,
    GroupStore,
};
use kindergarten_office::models::*;
use kindergarten_office::utils::errors::{KindergartenError, Result};

fn page<T: Clone>(rows: Vec<T>, window: PageWindow) -> (Vec<T>, i64) {
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(window.offset as usize)
        .take(window.limit as usize)
        .collect();
    (items, total)
}

fn contains(haystack: &str, needle: &Option<String>) -> bool {
    match needle.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[derive(Default)]
struct Counter {
    next_id: AtomicI64,
    writes: AtomicUsize,
}

impl Counter {
    fn id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Groups

#[derive(Default)]
pub struct MemoryGroups {
    rows: Mutex<Vec<Group>>,
    counter: Counter,
}

impl MemoryGroups {
    /// Seed a row without counting it as a write
    pub fn seed(&self, kindergarten_name: &str, group_name: &str, group_type: GroupType) -> Group {
        let group = Group {
            id: self.counter.id(),
            kindergarten_name: kindergarten_name.to_string(),
            group_name: group_name.to_string(),
            group_type,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(group.clone());
        group
    }

    pub fn get(&self, id: i64) -> Option<Group> {
        self.rows.lock().unwrap().iter().find(|g| g.id == id).cloned()
    }

    pub fn writes(&self) -> usize {
        self.counter.writes()
    }
}

#[async_trait]
impl GroupStore for MemoryGroups {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>> {
        Ok(self.get(id))
    }

    async fn find_by_name(
        &self,
        kindergarten_name: &str,
        group_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Group>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|g| {
                g.kindergarten_name == kindergarten_name && g.group_name == group_name && Some(g.id) != exclude_id
            })
            .cloned())
    }

    async fn list(&self, filter: &GroupFilter, window: PageWindow) -> Result<(Vec<Group>, i64)> {
        let rows: Vec<Group> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|g| contains(&g.kindergarten_name, &filter.kindergarten_name))
            .filter(|g| contains(&g.group_name, &filter.group_name))
            .filter(|g| filter.group_type.map_or(true, |t| t == g.group_type))
            .cloned()
            .collect();
        Ok(page(rows, window))
    }

    async fn create(&self, request: &CreateGroupRequest) -> Result<Group> {
        self.counter.write();
        Ok(self.seed(&request.kindergarten_name, &request.group_name, request.group_type))
    }

    async fn update(&self, id: i64, request: &UpdateGroupRequest) -> Result<Group> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let group = rows
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| KindergartenError::NotFound("Групу не знайдено".to_string()))?;
        if let Some(name) = &request.kindergarten_name {
            group.kindergarten_name = name.clone();
        }
        if let Some(name) = &request.group_name {
            group.group_name = name.clone();
        }
        if let Some(group_type) = request.group_type {
            group.group_type = group_type;
        }
        Ok(group.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|g| g.id != id);
        Ok(rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Children

pub struct MemoryChildren {
    rows: Mutex<Vec<Child>>,
    groups: Arc<MemoryGroups>,
    counter: Counter,
}

impl MemoryChildren {
    pub fn new(groups: Arc<MemoryGroups>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            groups,
            counter: Counter::default(),
        }
    }

    pub fn seed(&self, child_name: &str, parent_name: &str, group_id: i64) -> Child {
        let child = self.joined(Child {
            id: self.counter.id(),
            child_name: child_name.to_string(),
            parent_name: parent_name.to_string(),
            phone_number: None,
            group_id: Some(group_id),
            created_at: Utc::now(),
            group_name: None,
            kindergarten_name: None,
        });
        self.rows.lock().unwrap().push(child.clone());
        child
    }

    pub fn get(&self, id: i64) -> Option<Child> {
        let child = self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned();
        child.map(|c| self.joined(c))
    }

    pub fn all(&self) -> Vec<Child> {
        let rows = self.rows.lock().unwrap().clone();
        rows.into_iter().map(|c| self.joined(c)).collect()
    }

    pub fn writes(&self) -> usize {
        self.counter.writes()
    }

    fn joined(&self, mut child: Child) -> Child {
        let group = child.group_id.and_then(|id| self.groups.get(id));
        child.group_name = group.as_ref().map(|g| g.group_name.clone());
        child.kindergarten_name = group.map(|g| g.kindergarten_name);
        child
    }
}

#[async_trait]
impl ChildStore for MemoryChildren {
    async fn find_by_id(&self, id: i64) -> Result<Option<Child>> {
        Ok(self.get(id))
    }

    async fn find_duplicate(
        &self,
        child_name: &str,
        parent_name: &str,
        kindergarten_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Child>> {
        Ok(self.all().into_iter().find(|c| {
            c.child_name == child_name
                && c.parent_name == parent_name
                && c.kindergarten_name.as_deref() == Some(kindergarten_name)
                && Some(c.id) != exclude_id
        }))
    }

    async fn list(&self, filter: &ChildFilter, window: PageWindow) -> Result<(Vec<Child>, i64)> {
        let mut rows: Vec<Child> = self
            .all()
            .into_iter()
            .filter(|c| contains(&c.child_name, &filter.child_name))
            .filter(|c| contains(&c.parent_name, &filter.parent_name))
            .filter(|c| filter.group_id.map_or(true, |id| c.group_id == Some(id)))
            .collect();
        rows.sort_by(|a, b| a.child_name.cmp(&b.child_name));
        Ok(page(rows, window))
    }

    async fn create(&self, child: &NewChild) -> Result<Child> {
        self.counter.write();
        let mut created = self.seed(&child.child_name, &child.parent_name, child.group_id);
        if child.phone_number.is_some() {
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|c| c.id == created.id) {
                row.phone_number = child.phone_number.clone();
            }
            created.phone_number = child.phone_number.clone();
        }
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &ChildChanges) -> Result<Child> {
        self.counter.write();
        let updated = {
            let mut rows = self.rows.lock().unwrap();
            let child = rows
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| KindergartenError::NotFound("Дитину не знайдено".to_string()))?;
            if let Some(name) = &changes.child_name {
                child.child_name = name.clone();
            }
            if let Some(name) = &changes.parent_name {
                child.parent_name = name.clone();
            }
            if let Some(phone) = &changes.phone_number {
                child.phone_number = Some(phone.clone());
            }
            if let Some(group_id) = changes.group_id {
                child.group_id = Some(group_id);
            }
            child.clone()
        };
        Ok(self.joined(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Attendance

pub struct MemoryAttendance {
    rows: Mutex<Vec<AttendanceRecord>>,
    children: Arc<MemoryChildren>,
    counter: Counter,
}

impl MemoryAttendance {
    pub fn new(children: Arc<MemoryChildren>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            children,
            counter: Counter::default(),
        }
    }

    pub fn seed(&self, child_id: i64, date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        let now = Utc::now();
        let record = AttendanceRecord {
            id: self.counter.id(),
            date,
            child_id,
            attendance_status: status,
            notes: None,
            created_at: now,
            updated_at: now,
            child_name: None,
            group_name: None,
        };
        self.rows.lock().unwrap().push(record.clone());
        record
    }

    pub fn status_of(&self, child_id: i64, date: NaiveDate) -> Option<AttendanceStatus> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.child_id == child_id && r.date == date)
            .map(|r| r.attendance_status)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn writes(&self) -> usize {
        self.counter.writes()
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendance {
    async fn find_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        let record = self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned();
        Ok(record.map(|mut r| {
            if let Some(child) = self.children.get(r.child_id) {
                r.child_name = Some(child.child_name);
                r.group_name = child.group_name;
            }
            r
        }))
    }

    async fn find_by_child_and_date(&self, child_id: i64, date: NaiveDate) -> Result<Option<AttendanceRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.child_id == child_id && r.date == date)
            .cloned())
    }

    async fn list_sheet(
        &self,
        filter: &AttendanceSheetFilter,
        date: NaiveDate,
        window: PageWindow,
    ) -> Result<(Vec<AttendanceSheetRow>, i64)> {
        let mut rows: Vec<AttendanceSheetRow> = self
            .children
            .all()
            .into_iter()
            .filter(|c| contains(&c.child_name, &filter.child_name))
            .map(|c| {
                let record = self
                    .rows
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|r| r.child_id == c.id && r.date == date)
                    .cloned();
                AttendanceSheetRow {
                    child_id: c.id,
                    child_name: c.child_name,
                    group_name: c.group_name,
                    kindergarten_name: c.kindergarten_name,
                    attendance_id: record.as_ref().map(|r| r.id),
                    attendance_status: record.map_or(AttendanceStatus::Absent, |r| r.attendance_status),
                }
            })
            .filter(|row| filter.attendance_status.map_or(true, |s| s == row.attendance_status))
            .collect();
        rows.sort_by(|a, b| a.child_name.cmp(&b.child_name));
        Ok(page(rows, window))
    }

    async fn roster_for_date(&self, date: NaiveDate) -> Result<Vec<RosterEntry>> {
        let mut entries: Vec<RosterEntry> = self
            .children
            .all()
            .into_iter()
            .filter_map(|c| {
                let group_id = c.group_id?;
                let group_name = c.group_name.clone()?;
                Some(RosterEntry {
                    group_id,
                    group_name,
                    child_id: c.id,
                    attendance_status: self.status_of(c.id, date).map(|s| s.as_str().to_string()),
                    child_name: c.child_name,
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            (&a.group_name, a.group_id, &a.child_name, a.child_id).cmp(&(&b.group_name, b.group_id, &b.child_name, b.child_id))
        });
        Ok(entries)
    }

    async fn create(&self, record: &CreateAttendanceRequest) -> Result<AttendanceRecord> {
        self.counter.write();
        if self.status_of(record.child_id, record.date).is_some() {
            return Err(KindergartenError::Conflict("duplicate (child_id, date)".to_string()));
        }
        let mut created = self.seed(record.child_id, record.date, record.attendance_status);
        created.notes = record.notes.clone();
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &UpdateAttendanceRequest) -> Result<AttendanceRecord> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| KindergartenError::NotFound("Запис відвідуваності не знайдено".to_string()))?;
        if let Some(date) = changes.date {
            record.date = date;
        }
        if let Some(child_id) = changes.child_id {
            record.child_id = child_id;
        }
        if let Some(status) = changes.attendance_status {
            record.attendance_status = status;
        }
        if let Some(notes) = &changes.notes {
            record.notes = Some(notes.clone());
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Daily food cost

#[derive(Default)]
pub struct MemoryFoodCosts {
    rows: Mutex<Vec<DailyFoodCost>>,
    counter: Counter,
}

#[async_trait]
impl FoodCostStore for MemoryFoodCosts {
    async fn find_by_id(&self, id: i64) -> Result<Option<DailyFoodCost>> {
        Ok(self.rows.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_date(&self, date: NaiveDate, exclude_id: Option<i64>) -> Result<Option<DailyFoodCost>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.date == date && Some(f.id) != exclude_id)
            .cloned())
    }

    async fn list(&self, filter: &FoodCostFilter, window: PageWindow) -> Result<(Vec<DailyFoodCost>, i64)> {
        let mut rows: Vec<DailyFoodCost> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| filter.date_from.map_or(true, |from| f.date >= from))
            .filter(|f| filter.date_to.map_or(true, |to| f.date <= to))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(page(rows, window))
    }

    async fn create(&self, request: &CreateFoodCostRequest) -> Result<DailyFoodCost> {
        self.counter.write();
        let cost = DailyFoodCost {
            id: self.counter.id(),
            date: request.date,
            young_group_cost: request.young_group_cost,
            older_group_cost: request.older_group_cost,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(cost.clone());
        Ok(cost)
    }

    async fn update(&self, id: i64, request: &UpdateFoodCostRequest) -> Result<DailyFoodCost> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let cost = rows
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| KindergartenError::NotFound("Запис не знайдено".to_string()))?;
        if let Some(date) = request.date {
            cost.date = date;
        }
        if let Some(value) = request.young_group_cost {
            cost.young_group_cost = value;
        }
        if let Some(value) = request.older_group_cost {
            cost.older_group_cost = value;
        }
        Ok(cost.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| f.id != id);
        Ok(rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Billing

#[derive(Default)]
pub struct MemoryBilling {
    rows: Mutex<Vec<BillingRecord>>,
    counter: Counter,
}

impl MemoryBilling {
    pub fn writes(&self) -> usize {
        self.counter.writes()
    }
}

#[async_trait]
impl BillingStore for MemoryBilling {
    async fn find_by_id(&self, id: i64) -> Result<Option<BillingRecord>> {
        Ok(self.rows.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_parent_and_month(
        &self,
        parent_name: &str,
        payment_month: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<Option<BillingRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.parent_name == parent_name && b.payment_month == payment_month && Some(b.id) != exclude_id)
            .cloned())
    }

    async fn list(&self, filter: &BillingFilter, window: PageWindow) -> Result<(Vec<BillingRecord>, i64)> {
        let rows: Vec<BillingRecord> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| contains(&b.parent_name, &filter.parent_name))
            .filter(|b| filter.balance_min.map_or(true, |min| b.balance >= min))
            .filter(|b| filter.balance_max.map_or(true, |max| b.balance <= max))
            .cloned()
            .collect();
        Ok(page(rows, window))
    }

    async fn create(&self, record: &NewBilling) -> Result<BillingRecord> {
        self.counter.write();
        let now = Utc::now();
        let created = BillingRecord {
            id: self.counter.id(),
            parent_name: record.parent_name.clone(),
            payment_month: record.payment_month,
            current_debt: record.current_debt,
            current_accrual: record.current_accrual,
            current_payment: record.current_payment,
            balance: billing_balance(record.current_debt, record.current_accrual, record.current_payment),
            notes: record.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &BillingChanges) -> Result<BillingRecord> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| KindergartenError::NotFound("Запис не знайдено".to_string()))?;
        if let Some(name) = &changes.parent_name {
            record.parent_name = name.clone();
        }
        if let Some(month) = changes.payment_month {
            record.payment_month = month;
        }
        if let Some(value) = changes.current_debt {
            record.current_debt = value;
        }
        if let Some(value) = changes.current_accrual {
            record.current_accrual = value;
        }
        if let Some(value) = changes.current_payment {
            record.current_payment = value;
        }
        if let Some(notes) = &changes.notes {
            record.notes = Some(notes.clone());
        }
        record.balance = billing_balance(record.current_debt, record.current_accrual, record.current_payment);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        Ok(rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Admins

#[derive(Default)]
pub struct MemoryAdmins {
    rows: Mutex<Vec<Admin>>,
    counter: Counter,
    failing: AtomicBool,
}

impl MemoryAdmins {
    pub fn seed(&self, phone_number: &str, full_name: &str, role: AdminRole) -> Admin {
        let now = Utc::now();
        let admin = Admin {
            id: self.counter.id(),
            phone_number: phone_number.to_string(),
            full_name: full_name.to_string(),
            kindergarten_name: "Сонечко".to_string(),
            role,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(admin.clone());
        admin
    }

    /// Make every lookup fail as if the database were down
    pub fn fail_lookups(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(KindergartenError::Internal("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AdminStore for MemoryAdmins {
    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>> {
        self.check()?;
        Ok(self.rows.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_phone(&self, phone_number: &str, exclude_id: Option<i64>) -> Result<Option<Admin>> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.phone_number == phone_number && Some(a.id) != exclude_id)
            .cloned())
    }

    async fn find_educator_by_phone(&self, phone_number: &str) -> Result<Option<Admin>> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.phone_number == phone_number && a.role == AdminRole::Educator)
            .cloned())
    }

    async fn list(&self, filter: &AdminFilter, window: PageWindow) -> Result<(Vec<Admin>, i64)> {
        self.check()?;
        let rows: Vec<Admin> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| contains(&a.full_name, &filter.full_name))
            .filter(|a| filter.role.map_or(true, |r| r == a.role))
            .cloned()
            .collect();
        Ok(page(rows, window))
    }

    async fn create(&self, request: &CreateAdminRequest) -> Result<Admin> {
        self.counter.write();
        let mut admin = self.seed(&request.phone_number, &request.full_name, request.role.unwrap_or_default());
        admin.kindergarten_name = request.kindergarten_name.clone();
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|a| a.id == admin.id) {
            row.kindergarten_name = admin.kindergarten_name.clone();
        }
        Ok(admin)
    }

    async fn update(&self, id: i64, request: &UpdateAdminRequest) -> Result<Admin> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let admin = rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| KindergartenError::NotFound("Адміністратора не знайдено".to_string()))?;
        if let Some(phone) = &request.phone_number {
            admin.phone_number = phone.clone();
        }
        if let Some(name) = &request.full_name {
            admin.full_name = name.clone();
        }
        if let Some(name) = &request.kindergarten_name {
            admin.kindergarten_name = name.clone();
        }
        if let Some(role) = request.role {
            admin.role = role;
        }
        Ok(admin.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.counter.write();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        Ok(rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Debtors

#[derive(Default)]
pub struct MemoryDebts {
    debtors: Mutex<Vec<i64>>,
    /// (debtor id, debt)
    rows: Mutex<Vec<(i64, Debt)>>,
    counter: Counter,
}

impl MemoryDebts {
    pub fn seed_debtor(&self) -> i64 {
        let id = self.counter.id();
        self.debtors.lock().unwrap().push(id);
        id
    }

    pub fn seed_debt(&self, debtor_id: i64, child_name: &str, amount: f64, group_number: &str, kindergarten: &str) -> Debt {
        let debt = Debt {
            id: self.counter.id(),
            child_name: child_name.to_string(),
            debt_amount: amount,
            group_number: Some(group_number.to_string()),
            kindergarten_name: Some(kindergarten.to_string()),
        };
        self.rows.lock().unwrap().push((debtor_id, debt.clone()));
        debt
    }
}

#[async_trait]
impl DebtStore for MemoryDebts {
    async fn list(&self, filter: &DebtFilter, window: PageWindow) -> Result<(Vec<Debt>, i64)> {
        let group_number = filter.group_number.as_deref().map(str::trim).filter(|g| !g.is_empty());
        let mut rows: Vec<Debt> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|(_, debt)| debt)
            .filter(|d| contains(&d.child_name, &filter.child_name))
            .filter(|d| contains(d.kindergarten_name.as_deref().unwrap_or(""), &filter.kindergarten_name))
            .filter(|d| group_number.map_or(true, |g| d.group_number.as_deref() == Some(g)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(page(rows, window))
    }

    async fn find_debtor(&self, id: i64) -> Result<Option<Debtor>> {
        if !self.debtors.lock().unwrap().contains(&id) {
            return Ok(None);
        }
        let debts = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(debtor_id, _)| *debtor_id == id)
            .map(|(_, debt)| debt.clone())
            .collect();
        Ok(Some(Debtor { id, debts }))
    }
}

// ---------------------------------------------------------------------------
// Audit

#[derive(Default)]
pub struct MemoryAudit {
    events: Mutex<Vec<AuditEvent>>,
    failing: AtomicBool,
}

impl MemoryAudit {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<AuditAction> {
        self.events().into_iter().map(|e| e.action).collect()
    }

    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuditStore for MemoryAudit {
    async fn record(&self, event: &AuditEvent, _application_name: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(KindergartenError::Internal("audit_log is unavailable".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------

/// One of each store, wired to each other the way the tables are joined
pub struct MemoryStores {
    pub groups: Arc<MemoryGroups>,
    pub children: Arc<MemoryChildren>,
    pub attendance: Arc<MemoryAttendance>,
    pub food_costs: Arc<MemoryFoodCosts>,
    pub billing: Arc<MemoryBilling>,
    pub admins: Arc<MemoryAdmins>,
    pub debts: Arc<MemoryDebts>,
    pub audit: Arc<MemoryAudit>,
}

impl MemoryStores {
    pub fn new() -> Self {
        let groups = Arc::new(MemoryGroups::default());
        let children = Arc::new(MemoryChildren::new(groups.clone()));
        let attendance = Arc::new(MemoryAttendance::new(children.clone()));

        Self {
            groups,
            children,
            attendance,
            food_costs: Arc::new(MemoryFoodCosts::default()),
            billing: Arc::new(MemoryBilling::default()),
            admins: Arc::new(MemoryAdmins::default()),
            debts: Arc::new(MemoryDebts::default()),
            audit: Arc::new(MemoryAudit::default()),
        }
    }

    pub fn database(&self) -> DatabaseService {
        DatabaseService::from_stores(
            self.groups.clone(),
            self.children.clone(),
            self.attendance.clone(),
            self.food_costs.clone(),
            self.billing.clone(),
            self.admins.clone(),
            self.debts.clone(),
            self.audit.clone(),
        )
    }
}
