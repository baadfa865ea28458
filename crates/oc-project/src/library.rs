//! In-memory edits on an equation library.
//!
//! Every mutation re-runs validation and keeps names unique.

use crate::schema::{EquationRecord, EquationSpec, Library};
use crate::validate::{ValidationError, validate};
use crate::{ProjectError, ProjectResult};

impl Library {
    pub fn get(&self, name: &str) -> Option<&EquationRecord> {
        self.equations.iter().find(|r| r.spec.name == name)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&EquationRecord> {
        self.equations.iter().find(|r| r.id == id)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.equations.iter().map(|r| r.spec.name.as_str())
    }

    /// Validate and append a new equation under a fresh id.
    pub fn insert(&mut self, spec: EquationSpec) -> ProjectResult<&EquationRecord> {
        check_spec(&spec)?;
        if self.get(&spec.name).is_some() {
            return Err(ValidationError::DuplicateName { name: spec.name }.into());
        }
        self.equations.push(EquationRecord::new(spec));
        let last = self.equations.len() - 1;
        Ok(&self.equations[last])
    }

    /// Apply `edit` to a copy of the named equation and store it if the
    /// result is still valid. The id is kept.
    pub fn update<F>(&mut self, name: &str, edit: F) -> ProjectResult<&EquationRecord>
    where
        F: FnOnce(&mut EquationSpec),
    {
        let idx = self.index_of(name)?;
        let mut spec = self.equations[idx].spec.clone();
        edit(&mut spec);
        check_spec(&spec)?;

        let renamed_onto_other = self
            .equations
            .iter()
            .enumerate()
            .any(|(i, r)| i != idx && r.spec.name == spec.name);
        if renamed_onto_other {
            return Err(ValidationError::DuplicateName { name: spec.name }.into());
        }

        self.equations[idx].spec = spec;
        Ok(&self.equations[idx])
    }

    pub fn remove(&mut self, name: &str) -> ProjectResult<EquationRecord> {
        let idx = self.index_of(name)?;
        Ok(self.equations.remove(idx))
    }

    fn index_of(&self, name: &str) -> ProjectResult<usize> {
        self.equations
            .iter()
            .position(|r| r.spec.name == name)
            .ok_or_else(|| ProjectError::NotFound {
                name: name.to_string(),
            })
    }
}

fn check_spec(spec: &EquationSpec) -> Result<(), ValidationError> {
    validate(spec).map_err(|errors| ValidationError::Entry {
        name: spec.name.clone(),
        errors,
    })
}
