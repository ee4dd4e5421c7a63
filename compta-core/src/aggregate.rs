use std::collections::{BTreeMap, HashSet};

use compta_ingest::PayoutRecord;
use tracing::debug;

use crate::model::PayoutGroup;

/// Payout lines grouped by reservation code, plus the lines that have none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayoutIndex {
    /// Keyed by code; iteration order is the code order.
    pub groups: BTreeMap<String, PayoutGroup>,
    /// Undetailed lines in input order, never grouped.
    pub no_detail: Vec<PayoutRecord>,
}

/// Group payout lines by code, drop repeated (amount, date) lines, sum the rest.
pub fn aggregate_payouts(payouts: &[PayoutRecord]) -> PayoutIndex {
    let mut buckets: BTreeMap<String, Vec<PayoutRecord>> = BTreeMap::new();
    let mut no_detail = Vec::new();

    for payout in payouts {
        if payout.is_undetailed() {
            no_detail.push(payout.clone());
        } else {
            buckets
                .entry(payout.code.clone())
                .or_default()
                .push(payout.clone());
        }
    }

    let groups = buckets
        .into_iter()
        .map(|(code, members)| {
            let group = build_group(code.clone(), members);
            (code, group)
        })
        .collect();

    PayoutIndex { groups, no_detail }
}

/// Build one group. Members are ordered by date (stable, unparseable first);
/// the first line of each (amount in cents, date) pair is kept.
pub fn build_group(code: String, mut members: Vec<PayoutRecord>) -> PayoutGroup {
    members.sort_by_key(|p| p.date.sort_key());

    let mut seen: HashSet<(i64, String)> = HashSet::new();
    let mut kept = Vec::with_capacity(members.len());
    for member in members {
        if seen.insert((member.amount_cents(), member.date.dedup_key())) {
            kept.push(member);
        } else {
            debug!(
                code = %code,
                amount = member.amount,
                date = %member.date.raw,
                "dropping duplicate payout line"
            );
        }
    }

    let total_cents: i64 = kept.iter().map(|m| m.amount_cents()).sum();
    let count = kept.len();
    let detail = if count > 1 {
        kept.iter()
            .map(|m| format!("{:.2}€ ({})", m.amount, m.date.raw))
            .collect::<Vec<_>>()
            .join(" + ")
    } else {
        String::new()
    };

    PayoutGroup {
        code,
        total: total_cents as f64 / 100.0,
        count,
        detail,
        members: kept,
    }
}
