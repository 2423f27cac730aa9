//! Synthetic records for bulk operations
//!
//! Every harness owns one generator. Records carry a per-generator run tag
//! and a monotonically increasing sequence number, so codes and e-mails are
//! unique within a run and across concurrently running suites.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Daniel", "Elena", "Farid", "Grace", "Hiro", "Isabel", "Jonas",
    "Kanya", "Liam", "Mali", "Niran", "Olivia", "Pim",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Boonmee", "Chen", "Dubois", "Evans", "Fischer", "Garcia", "Hansen", "Ito",
    "Jaidee", "Kowalski", "Lopez", "Morgan", "Nguyen",
];

const COMPANY_NOUNS: &[&str] = &[
    "Holdings", "Labs", "Group", "Partners", "Industries", "Systems", "Logistics", "Studio",
];

const LOCALES: &[&str] = &["EN", "TH"];

/// Harness-scoped fixture generator
#[derive(Debug)]
pub struct Fixtures {
    rng: Mutex<StdRng>,
    run_tag: String,
    sequence: AtomicU64,
}

impl Fixtures {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let run_tag = format!("{:06x}", rng.gen::<u32>() & 0x00ff_ffff);
        Self {
            rng: Mutex::new(rng),
            run_tag,
            sequence: AtomicU64::new(0),
        }
    }

    /// Tag embedded in every generated code and e-mail
    pub fn run_tag(&self) -> &str {
        &self.run_tag
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn pick(&self, items: &[&'static str]) -> &'static str {
        let mut rng = self.rng.lock();
        items.choose(&mut *rng).copied().unwrap_or("Test")
    }

    /// One company record: `{ code, slug, name, description, email, phone }`
    pub fn company(&self) -> Value {
        let seq = self.next_seq();
        let tag = self.run_tag.to_uppercase();
        let noun = self.pick(COMPANY_NOUNS);
        let phone = self.phone();
        json!({
            "code": format!("BULK{}{:04}", tag, seq),
            "slug": format!("bulk-{}-{}", self.run_tag, seq),
            "name": format!("Bulk {} {} {}", noun, tag, seq),
            "description": "Generated by the API test harness",
            "email": format!("company.{}.{}@harness.test", self.run_tag, seq),
            "phone": phone,
        })
    }

    pub fn companies(&self, count: usize) -> Vec<Value> {
        (0..count).map(|_| self.company()).collect()
    }

    /// One employee record: `{ email, firstname, lastname, phone, preferredLocale }`
    pub fn employee(&self) -> Value {
        let seq = self.next_seq();
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        let locale = self.pick(LOCALES);
        let phone = self.phone();
        json!({
            "email": format!(
                "{}.{}.{}{}@harness.test",
                first.to_lowercase(),
                last.to_lowercase(),
                self.run_tag,
                seq
            ),
            "firstname": first,
            "lastname": last,
            "phone": phone,
            "preferredLocale": locale,
        })
    }

    pub fn employees(&self, count: usize) -> Vec<Value> {
        (0..count).map(|_| self.employee()).collect()
    }

    fn phone(&self) -> String {
        let number: u32 = self.rng.lock().gen_range(100_000_000..1_000_000_000);
        format!("+66{}", number)
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::new()
    }
}
