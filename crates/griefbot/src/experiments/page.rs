//! Page specs and per-player page sequencing

use serde::Serialize;

/// Where a player currently is in the experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerContext {
    /// 1-based position within the group
    pub id_in_group: usize,
    /// 1-based round number
    pub round_number: u32,
}

impl PlayerContext {
    pub fn new(id_in_group: usize, round_number: u32) -> Self {
        Self {
            id_in_group,
            round_number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Page,
    /// Blocks until every group member arrives
    WaitPage {
        /// Payoffs are computed once everyone has arrived
        sets_payoffs: bool,
    },
}

/// Record a page's form writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormModel {
    Group,
    Player,
}

/// Display predicate of a page
pub type DisplayRule = fn(&PlayerContext) -> bool;

fn always(_: &PlayerContext) -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSpec {
    pub name: &'static str,
    pub kind: PageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_model: Option<FormModel>,
    pub form_fields: &'static [&'static str],
    #[serde(skip)]
    display: DisplayRule,
}

impl PageSpec {
    pub fn page(name: &'static str) -> Self {
        Self {
            name,
            kind: PageKind::Page,
            form_model: None,
            form_fields: &[],
            display: always,
        }
    }

    pub fn wait_page(name: &'static str) -> Self {
        Self {
            kind: PageKind::WaitPage {
                sets_payoffs: false,
            },
            ..Self::page(name)
        }
    }

    pub fn payoff_wait_page(name: &'static str) -> Self {
        Self {
            kind: PageKind::WaitPage { sets_payoffs: true },
            ..Self::page(name)
        }
    }

    pub fn form(mut self, model: FormModel, fields: &'static [&'static str]) -> Self {
        self.form_model = Some(model);
        self.form_fields = fields;
        self
    }

    pub fn shown_when(mut self, rule: DisplayRule) -> Self {
        self.display = rule;
        self
    }

    pub fn is_displayed(&self, player: &PlayerContext) -> bool {
        (self.display)(player)
    }

    pub fn is_wait_page(&self) -> bool {
        matches!(self.kind, PageKind::WaitPage { .. })
    }
}

/// Pages a player sees in a round, in order
pub fn page_sequence_for<'a>(pages: &'a [PageSpec], player: &PlayerContext) -> Vec<&'a PageSpec> {
    pages.iter().filter(|page| page.is_displayed(player)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_round_only(player: &PlayerContext) -> bool {
        player.round_number == 1
    }

    #[test]
    fn test_sequence_filters_hidden_pages() {
        let pages = vec![
            PageSpec::page("Introduction").shown_when(first_round_only),
            PageSpec::wait_page("Sync"),
            PageSpec::payoff_wait_page("ResultsWaitPage"),
            PageSpec::page("Results"),
        ];

        let round1: Vec<&str> = page_sequence_for(&pages, &PlayerContext::new(1, 1))
            .iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(round1, vec!["Introduction", "Sync", "ResultsWaitPage", "Results"]);

        let round2: Vec<&str> = page_sequence_for(&pages, &PlayerContext::new(1, 2))
            .iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(round2, vec!["Sync", "ResultsWaitPage", "Results"]);
        assert!(pages[2].is_wait_page());
    }
}
