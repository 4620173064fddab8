//! Grouped totals over a parsed statement.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{ParsedStatement, Section, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub count: usize,
    pub total: Decimal,
}

impl Totals {
    fn of<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Self {
        txns.into_iter().fold(Totals::default(), |acc, t| Totals {
            count: acc.count + 1,
            total: acc.total + t.amount,
        })
    }
}

/// New charges attributed to one card (`None` = charged before any card announcement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardTotals {
    pub card_ending: Option<String>,
    #[serde(flatten)]
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementSummary {
    pub payments: Totals,
    pub credits: Totals,
    pub debits: Totals,
    /// Sorted by card ending, the unattributed bucket first.
    pub cards: Vec<CardTotals>,
}

impl StatementSummary {
    pub fn from_statement(stmt: &ParsedStatement) -> Self {
        let mut by_card: BTreeMap<Option<&str>, Vec<&Transaction>> = BTreeMap::new();
        for t in &stmt.debits {
            by_card.entry(t.card_ending.as_deref()).or_default().push(t);
        }

        let cards = by_card
            .into_iter()
            .map(|(card, txns)| CardTotals {
                card_ending: card.map(str::to_string),
                totals: Totals::of(txns),
            })
            .collect();

        Self {
            payments: Totals::of(&stmt.payments),
            credits: Totals::of(&stmt.credits),
            debits: Totals::of(&stmt.debits),
            cards,
        }
    }

    pub fn section(&self, section: Section) -> Totals {
        match section {
            Section::Payments => self.payments,
            Section::Credits => self.credits,
            Section::Debits => self.debits,
        }
    }

    /// Sum over all three sections.
    pub fn net(&self) -> Decimal {
        self.payments.total + self.credits.total + self.debits.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(desc: &str, cents: i64, card: Option<&str>) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            description: desc.to_string(),
            amount: Decimal::new(cents, 2),
            card_ending: card.map(str::to_string),
        }
    }

    #[test]
    fn test_summary_totals() {
        let mut stmt = ParsedStatement::default();
        stmt.push(Section::Payments, txn("AUTOPAY", -50000, None));
        stmt.push(Section::Credits, txn("REFUND", -1250, Some("1-11111")));
        stmt.push(Section::Debits, txn("FEE", 100, None));
        stmt.push(Section::Debits, txn("TAXI", 2000, Some("2-22222")));
        stmt.push(Section::Debits, txn("COFFEE", 450, Some("1-11111")));
        stmt.push(Section::Debits, txn("LUNCH", 1550, Some("1-11111")));

        let s = StatementSummary::from_statement(&stmt);
        assert_eq!(s.payments, Totals { count: 1, total: Decimal::new(-50000, 2) });
        assert_eq!(s.credits.count, 1);
        assert_eq!(s.debits, Totals { count: 4, total: Decimal::new(4100, 2) });
        assert_eq!(s.section(Section::Debits).count, 4);
        assert_eq!(s.net(), Decimal::new(-50000 - 1250 + 4100, 2));

        let cards: Vec<_> = s
            .cards
            .iter()
            .map(|c| (c.card_ending.as_deref(), c.totals.count, c.totals.total))
            .collect();
        assert_eq!(
            cards,
            vec![
                (None, 1, Decimal::new(100, 2)),
                (Some("1-11111"), 2, Decimal::new(2000, 2)),
                (Some("2-22222"), 1, Decimal::new(2000, 2)),
            ]
        );
    }

    #[test]
    fn test_empty_summary() {
        let s = StatementSummary::from_statement(&ParsedStatement::default());
        assert_eq!(s.debits, Totals::default());
        assert!(s.cards.is_empty());
        assert_eq!(s.net(), Decimal::ZERO);
    }
}
