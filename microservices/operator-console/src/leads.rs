//! Fixed lead roster dialed by the triple call

use bridge_core::Lead;
use std::sync::Arc;

/// Small, static set of leads. Not paginated, not persisted.
#[derive(Debug, Clone)]
pub struct LeadRoster {
    leads: Arc<[Lead]>,
}

impl LeadRoster {
    pub fn new(leads: Vec<Lead>) -> Self {
        Self { leads: leads.into() }
    }

    /// The three leads the console ships with
    pub fn default_roster() -> Self {
        Self::new(vec![
            Lead::new("lead1", "+972500000001", "Ziv"),
            Lead::new("lead2", "+972500000002", "Yoni"),
            Lead::new("lead3", "+972500000003", "Shay"),
        ])
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn first(&self) -> Option<&Lead> {
        self.leads.first()
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn phone_numbers(&self) -> Vec<String> {
        self.leads.iter().map(|l| l.phone_number.clone()).collect()
    }
}

impl Default for LeadRoster {
    fn default() -> Self {
        Self::default_roster()
    }
}
