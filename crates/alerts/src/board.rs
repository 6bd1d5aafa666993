//! Transient alert state: the latest evaluation plus what the operator dismissed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertId, Severity};

/// Per-severity counts of active (not dismissed) alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub success: usize,
    pub opportunity: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AlertBoard {
    alerts: Vec<Alert>,
    dismissed: HashSet<AlertId>,
}

impl AlertBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh evaluation.
    ///
    /// Dismissals survive for alerts that are raised again and are dropped for
    /// alerts that stopped firing, so a problem that clears and later returns
    /// shows up again.
    pub fn replace(&mut self, alerts: Vec<Alert>) {
        let live: HashSet<&AlertId> = alerts.iter().map(|a| &a.id).collect();
        self.dismissed.retain(|id| live.contains(id));
        self.alerts = alerts;
    }

    /// Hide one alert. Returns `false` if no active alert has that id.
    pub fn dismiss(&mut self, id: &AlertId) -> bool {
        if !self.alerts.iter().any(|a| &a.id == id) {
            return false;
        }
        self.dismissed.insert(id.clone())
    }

    /// Bring back every dismissed alert; returns how many were hidden.
    pub fn restore_all(&mut self) -> usize {
        let n = self.dismissed.len();
        self.dismissed.clear();
        n
    }

    pub fn is_dismissed(&self, id: &AlertId) -> bool {
        self.dismissed.contains(id)
    }

    /// Alerts not dismissed, in evaluation order.
    pub fn active(&self) -> impl Iterator<Item = &Alert> + '_ {
        self.alerts.iter().filter(|a| !self.dismissed.contains(&a.id))
    }

    /// Every alert of the latest evaluation, dismissed or not.
    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn counts(&self) -> AlertCounts {
        let mut counts = AlertCounts::default();
        for alert in self.active() {
            match alert.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
                Severity::Success => counts.success += 1,
                Severity::Opportunity => counts.opportunity += 1,
            }
            counts.total += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::Category;
    use chrono::{TimeZone, Utc};

    fn alert(id: &str, severity: Severity) -> Alert {
        Alert::new(
            AlertId::from(id),
            severity,
            Category::Inventory,
            id,
            id,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn active_ids(board: &AlertBoard) -> Vec<String> {
        board.active().map(|a| a.id.to_string()).collect()
    }

    #[test]
    fn dismiss_hides_only_that_alert() {
        let mut board = AlertBoard::new();
        board.replace(vec![
            alert("a", Severity::Critical),
            alert("b", Severity::Warning),
            alert("c", Severity::Info),
        ]);

        assert!(board.dismiss(&AlertId::from("b")));
        assert_eq!(active_ids(&board), vec!["a", "c"]);
        assert_eq!(board.all().len(), 3);

        // Already dismissed / unknown.
        assert!(!board.dismiss(&AlertId::from("b")));
        assert!(!board.dismiss(&AlertId::from("zzz")));

        let counts = board.counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.warning, 0);
        assert_eq!(counts.critical, 1);
    }

    #[test]
    fn dismissals_follow_reraised_ids_and_drop_cleared_ones() {
        let mut board = AlertBoard::new();
        board.replace(vec![alert("a", Severity::Warning), alert("b", Severity::Warning)]);
        board.dismiss(&AlertId::from("a"));
        board.dismiss(&AlertId::from("b"));

        // "a" fires again, "b" cleared.
        board.replace(vec![alert("a", Severity::Warning)]);
        assert!(board.is_dismissed(&AlertId::from("a")));
        assert!(!board.is_dismissed(&AlertId::from("b")));

        // "b" returns later: visible again.
        board.replace(vec![alert("a", Severity::Warning), alert("b", Severity::Warning)]);
        assert_eq!(active_ids(&board), vec!["b"]);
    }

    #[test]
    fn restore_all_brings_everything_back() {
        let mut board = AlertBoard::new();
        board.replace(vec![alert("a", Severity::Success), alert("b", Severity::Opportunity)]);
        board.dismiss(&AlertId::from("a"));
        board.dismiss(&AlertId::from("b"));
        assert_eq!(board.counts().total, 0);

        assert_eq!(board.restore_all(), 2);
        assert_eq!(board.counts().total, 2);
        assert_eq!(board.counts().opportunity, 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Dismissing any one alert removes exactly that alert from the active list.
            #[test]
            fn dismiss_removes_exactly_one(n in 1usize..20, pick in 0usize..20) {
                let pick = pick % n;
                let alerts: Vec<Alert> = (0..n).map(|i| alert(&format!("rule.{i}"), Severity::Info)).collect();
                let mut board = AlertBoard::new();
                board.replace(alerts.clone());

                let target = alerts[pick].id.clone();
                prop_assert!(board.dismiss(&target));

                let active: Vec<&Alert> = board.active().collect();
                prop_assert_eq!(active.len(), n - 1);
                prop_assert!(active.iter().all(|a| a.id != target));
            }
        }
    }
}
