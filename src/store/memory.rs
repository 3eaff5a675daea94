use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;

use super::{LeaveQuery, LeaveRepository};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::service::id_generator::parse_leave_number;

/// Process-local store. Rows are kept ordered by ID, like the SQL `ORDER BY id`.
#[derive(Default)]
pub struct MemoryStore {
    employees: RwLock<Vec<Employee>>,
    leaves: RwLock<BTreeMap<String, LeaveRequest>>,
    sequence: AtomicU64,
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("memory store lock poisoned")
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(mut employees: Vec<Employee>) -> Self {
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            employees: RwLock::new(employees),
            ..Self::default()
        }
    }

    /// Directory used when the service runs without a database.
    pub fn with_demo_employees() -> Self {
        let employee = |id: &str, first: &str, last: &str| Employee {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(format!("{}.{}@company.com", first, last).to_lowercase()),
        };
        Self::with_employees(vec![
            employee("E001", "John", "Doe"),
            employee("E002", "Jane", "Smith"),
            employee("A001", "Alex", "Admin"),
        ])
    }

    /// Inserts rows as-is and moves the sequence past their numeric suffixes.
    pub fn seed_leaves(&self, leaves: Vec<LeaveRequest>) -> Result<()> {
        let mut map = self.leaves.write().map_err(poisoned)?;
        for leave in leaves {
            if let Some(n) = parse_leave_number(&leave.id) {
                self.sequence.fetch_max(n, Ordering::SeqCst);
            }
            map.insert(leave.id.clone(), leave);
        }
        Ok(())
    }
}

#[async_trait]
impl LeaveRepository for MemoryStore {
    async fn find_employee_by_name_fragment(&self, fragment: &str) -> Result<Option<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees
            .iter()
            .find(|e| e.first_name.contains(fragment))
            .cloned())
    }

    async fn next_sequence_value(&self) -> Result<u64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn max_leave_number(&self) -> Result<Option<u64>> {
        let leaves = self.leaves.read().map_err(poisoned)?;
        Ok(leaves.keys().filter_map(|id| parse_leave_number(id)).max())
    }

    async fn insert_leave(&self, leave: &LeaveRequest) -> Result<()> {
        let mut leaves = self.leaves.write().map_err(poisoned)?;
        if leaves.contains_key(&leave.id) {
            bail!("duplicate leave request id {}", leave.id);
        }
        leaves.insert(leave.id.clone(), leave.clone());
        Ok(())
    }

    async fn list_leaves(&self, query: &LeaveQuery) -> Result<(Vec<LeaveRequest>, i64)> {
        let leaves = self.leaves.read().map_err(poisoned)?;
        let matching: Vec<&LeaveRequest> = leaves.values().filter(|l| query.matches(l)).collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn get_leave(&self, id: &str, owner: Option<&str>) -> Result<Option<LeaveRequest>> {
        let leaves = self.leaves.read().map_err(poisoned)?;
        Ok(leaves
            .get(id)
            .filter(|l| owner.is_none_or(|o| l.employee_id == o))
            .cloned())
    }

    async fn update_leave(&self, leave: &LeaveRequest, expected: LeaveStatus) -> Result<u64> {
        let mut leaves = self.leaves.write().map_err(poisoned)?;
        match leaves.get_mut(&leave.id) {
            Some(stored) if stored.status == expected => {
                stored.start_date = leave.start_date;
                stored.end_date = leave.end_date;
                stored.reason = leave.reason.clone();
                stored.leave_type = leave.leave_type;
                stored.status = leave.status;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn update_status(&self, id: &str, from: LeaveStatus, to: LeaveStatus) -> Result<u64> {
        let mut leaves = self.leaves.write().map_err(poisoned)?;
        match leaves.get_mut(id) {
            Some(stored) if stored.status == from => {
                stored.status = to;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_leave(&self, id: &str, owner: Option<&str>) -> Result<u64> {
        let mut leaves = self.leaves.write().map_err(poisoned)?;
        let visible = leaves
            .get(id)
            .is_some_and(|l| owner.is_none_or(|o| l.employee_id == o));
        if visible {
            leaves.remove(id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn employee_exists(&self, id: &str) -> Result<bool> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees.iter().any(|e| e.id == id))
    }
}
