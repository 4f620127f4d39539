use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::action::{ALL_ACTION_ALIASES, ActionAlias, ActionAliasError};
use crate::plan::ChangeRecord;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSummary {
    counts: BTreeMap<ActionAlias, usize>,
}

impl ChangeSummary {
    pub fn from_records(records: &[ChangeRecord]) -> Result<Self, ActionAliasError> {
        let mut counts = BTreeMap::new();
        for record in records {
            *counts.entry(record.action_alias()?).or_insert(0) += 1;
        }
        Ok(Self { counts })
    }

    pub fn count(&self, alias: ActionAlias) -> usize {
        self.counts.get(&alias).copied().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn changed(&self) -> usize {
        self.total() - self.count(ActionAlias::NoOp)
    }
}

impl Display for ChangeSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts = ALL_ACTION_ALIASES
            .iter()
            .map(|alias| format!("{alias}={}", self.count(*alias)))
            .collect::<Vec<_>>();
        f.write_str(&parts.join(" "))
    }
}
