use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three transaction categories a statement is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Payments,
    Credits,
    Debits,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Payments, Section::Credits, Section::Debits];

    /// Section opened by an exact header line, if any.
    pub fn from_header(line: &str) -> Option<Section> {
        match line {
            "Payments Details" => Some(Section::Payments),
            "Credits Details" => Some(Section::Credits),
            "New Charges Details" => Some(Section::Debits),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Payments => "payments",
            Section::Credits => "credits",
            Section::Debits => "debits",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One transaction recovered from statement text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Signed, as printed on the statement (payments and credits are usually negative).
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_ending: Option<String>,
}

/// Parser output: one ordered list per section, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStatement {
    pub payments: Vec<Transaction>,
    pub credits: Vec<Transaction>,
    pub debits: Vec<Transaction>,
}

impl ParsedStatement {
    pub fn section(&self, section: Section) -> &[Transaction] {
        match section {
            Section::Payments => &self.payments,
            Section::Credits => &self.credits,
            Section::Debits => &self.debits,
        }
    }

    pub fn push(&mut self, section: Section, txn: Transaction) {
        match section {
            Section::Payments => self.payments.push(txn),
            Section::Credits => self.credits.push(txn),
            Section::Debits => self.debits.push(txn),
        }
    }

    /// Move all of `other`'s transactions after this statement's, section by section.
    pub fn append(&mut self, mut other: ParsedStatement) {
        self.payments.append(&mut other.payments);
        self.credits.append(&mut other.credits);
        self.debits.append(&mut other.debits);
    }

    pub fn len(&self) -> usize {
        self.payments.len() + self.credits.len() + self.debits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All transactions tagged with their section, payments first, then credits, then debits.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &Transaction)> {
        Section::ALL
            .into_iter()
            .flat_map(move |s| self.section(s).iter().map(move |t| (s, t)))
    }

    /// Keep only transactions dated within `year`-`month`.
    ///
    /// An out-of-range month matches nothing.
    pub fn filter_month(&self, year: i32, month: u32) -> ParsedStatement {
        let keep = |txns: &[Transaction]| -> Vec<Transaction> {
            txns.iter()
                .filter(|t| t.date.year() == year && t.date.month() == month)
                .cloned()
                .collect()
        };

        ParsedStatement {
            payments: keep(&self.payments),
            credits: keep(&self.credits),
            debits: keep(&self.debits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(y: i32, m: u32, d: u32, desc: &str, cents: i64) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            description: desc.to_string(),
            amount: Decimal::new(cents, 2),
            card_ending: None,
        }
    }

    #[test]
    fn test_section_headers() {
        assert_eq!(Section::from_header("Payments Details"), Some(Section::Payments));
        assert_eq!(Section::from_header("Credits Details"), Some(Section::Credits));
        assert_eq!(Section::from_header("New Charges Details"), Some(Section::Debits));
        assert_eq!(Section::from_header("payments details"), None);
        assert_eq!(Section::from_header("New Charges Summary"), None);
    }

    #[test]
    fn test_section_display_honours_width() {
        assert_eq!(format!("{:<10}|", Section::Debits), "debits    |");
        assert_eq!(format!("{:>9}", Section::Credits), "  credits");
        assert_eq!(Section::Payments.to_string(), "payments");
    }

    #[test]
    fn test_iter_orders_by_section() {
        let mut stmt = ParsedStatement::default();
        stmt.push(Section::Debits, txn(2024, 1, 2, "B", 100));
        stmt.push(Section::Payments, txn(2024, 1, 3, "A", -100));
        stmt.push(Section::Debits, txn(2024, 1, 1, "C", 200));

        let order: Vec<_> = stmt.iter().map(|(s, t)| (s, t.description.as_str())).collect();
        assert_eq!(
            order,
            vec![
                (Section::Payments, "A"),
                (Section::Debits, "B"),
                (Section::Debits, "C"),
            ]
        );
        assert_eq!(stmt.len(), 3);
    }

    #[test]
    fn test_append_keeps_order() {
        let mut a = ParsedStatement::default();
        a.push(Section::Debits, txn(2024, 1, 1, "FIRST", 100));
        let mut b = ParsedStatement::default();
        b.push(Section::Debits, txn(2023, 12, 1, "SECOND", 200));
        b.push(Section::Credits, txn(2023, 12, 2, "REFUND", -200));

        a.append(b);
        let descs: Vec<_> = a.debits.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["FIRST", "SECOND"]);
        assert_eq!(a.credits.len(), 1);
    }

    #[test]
    fn test_filter_month() {
        let mut stmt = ParsedStatement::default();
        stmt.push(Section::Debits, txn(2024, 1, 31, "JAN", 100));
        stmt.push(Section::Debits, txn(2024, 2, 1, "FEB", 200));
        stmt.push(Section::Credits, txn(2023, 2, 10, "OLD FEB", -50));

        let feb = stmt.filter_month(2024, 2);
        assert_eq!(feb.debits.len(), 1);
        assert_eq!(feb.debits[0].description, "FEB");
        assert!(feb.credits.is_empty());

        assert!(stmt.filter_month(2024, 13).is_empty());
    }

    #[test]
    fn test_serializes_fixed_keys() {
        let mut stmt = ParsedStatement::default();
        stmt.push(Section::Payments, txn(2024, 1, 5, "AUTOPAY PAYMENT", -12500));

        let v = serde_json::to_value(&stmt).unwrap();
        let obj = v.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["credits", "debits", "payments"]);

        let p = &obj["payments"][0];
        assert_eq!(p["date"], "2024-01-05");
        assert_eq!(p["amount"], "-125.00");
        assert!(p.get("card_ending").is_none());
    }
}
