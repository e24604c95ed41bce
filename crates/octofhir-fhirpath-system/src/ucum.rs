//! Unit catalog and conversion algebra
//!
//! Units form a forest: each entry optionally links to a parent unit with
//! a conversion factor, and chains terminate at a family root (second,
//! meter, gram). Calendar-duration units convert through fixed
//! approximations (day = 86400 s, week = 7 d, month = 30 d, year = 365 d);
//! this is deliberately distinct from the calendar-correct arithmetic used
//! when adding durations to dates.
//!
//! The catalog is built once and read-only afterwards. Quantity values
//! reference entries by token; they never copy catalog data.

use indexmap::IndexMap;
use log::trace;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use smallvec::SmallVec;

/// Link from a unit to the next coarser unit in its family.
/// One of this unit equals `factor` of the parent.
#[derive(Debug, Clone)]
pub struct RootBase {
    pub parent: &'static str,
    pub factor: Decimal,
}

/// One catalog entry: a UCUM code, the calendar words that mean the same
/// thing (when the grammar admits any), and the link toward the family
/// root.
#[derive(Debug, Clone)]
pub struct QuantityUnit {
    pub code: &'static str,
    pub singular: Option<&'static str>,
    pub plural: Option<&'static str>,
    pub root: Option<RootBase>,
}

impl QuantityUnit {
    /// Whether this entry is the root of its family
    pub fn is_root(&self) -> bool {
        self.root.is_none()
    }

    /// Whether `token` is this entry's code or one of its words
    pub fn matches(&self, token: &str) -> bool {
        self.code == token || self.singular == Some(token) || self.plural == Some(token)
    }
}

/// Raise a factor to a small exponent without the maths feature.
fn pow_exp(base: Decimal, exp: u8) -> Option<Decimal> {
    let mut acc = Decimal::ONE;
    for _ in 0..exp {
        acc = acc.checked_mul(base)?;
    }
    Some(acc)
}

/// The process-wide unit registry.
pub struct UnitCatalog {
    units: Vec<QuantityUnit>,
    index: IndexMap<&'static str, usize>,
}

static CATALOG: Lazy<UnitCatalog> = Lazy::new(UnitCatalog::build);

impl UnitCatalog {
    /// The shared catalog instance
    pub fn global() -> &'static UnitCatalog {
        &CATALOG
    }

    fn build() -> Self {
        fn unit(
            code: &'static str,
            words: Option<(&'static str, &'static str)>,
            root: Option<(&'static str, Decimal)>,
        ) -> QuantityUnit {
            QuantityUnit {
                code,
                singular: words.map(|(s, _)| s),
                plural: words.map(|(_, p)| p),
                root: root.map(|(parent, factor)| RootBase { parent, factor }),
            }
        }

        let milli = Decimal::new(1, 3);
        let units = vec![
            // Time, rooted at the second
            unit("ns", None, Some(("us", milli))),
            unit("us", None, Some(("ms", milli))),
            unit("ms", Some(("millisecond", "milliseconds")), Some(("s", milli))),
            unit("s", Some(("second", "seconds")), None),
            unit("min", Some(("minute", "minutes")), Some(("s", Decimal::from(60)))),
            unit("h", Some(("hour", "hours")), Some(("min", Decimal::from(60)))),
            unit("d", Some(("day", "days")), Some(("h", Decimal::from(24)))),
            unit("wk", Some(("week", "weeks")), Some(("d", Decimal::from(7)))),
            unit("mo", Some(("month", "months")), Some(("d", Decimal::from(30)))),
            unit("a", Some(("year", "years")), Some(("d", Decimal::from(365)))),
            // Length, rooted at the meter
            unit("nm", None, Some(("um", milli))),
            unit("um", None, Some(("mm", milli))),
            unit("mm", None, Some(("cm", Decimal::new(1, 1)))),
            unit("cm", None, Some(("m", Decimal::new(1, 2)))),
            unit("m", None, None),
            unit("km", None, Some(("m", Decimal::from(1000)))),
            // Mass, rooted at the gram
            unit("ng", None, Some(("ug", milli))),
            unit("ug", None, Some(("mg", milli))),
            unit("mg", None, Some(("g", milli))),
            unit("g", None, None),
            unit("kg", None, Some(("g", Decimal::from(1000)))),
        ];

        let mut index = IndexMap::new();
        for (slot, entry) in units.iter().enumerate() {
            index.insert(entry.code, slot);
            if let Some(s) = entry.singular {
                index.insert(s, slot);
            }
            if let Some(p) = entry.plural {
                index.insert(p, slot);
            }
        }
        Self { units, index }
    }

    /// Look up a unit by UCUM code or calendar word.
    pub fn resolve(&self, token: &str) -> Option<&QuantityUnit> {
        self.index.get(token).map(|&slot| &self.units[slot])
    }

    fn entry(&self, code: &str) -> &QuantityUnit {
        &self.units[self.index[code]]
    }

    /// Codes along the chain from `unit` to its family root, inclusive.
    fn chain(&self, unit: &QuantityUnit) -> SmallVec<[&'static str; 6]> {
        let mut codes = SmallVec::new();
        let mut current = unit.code;
        loop {
            codes.push(current);
            match &self.entry(current).root {
                Some(link) => current = link.parent,
                None => break,
            }
        }
        codes
    }

    /// The root of this unit's family.
    pub fn root_of(&self, unit: &QuantityUnit) -> &QuantityUnit {
        let chain = self.chain(unit);
        self.entry(chain[chain.len() - 1])
    }

    /// Cumulative factor from this unit to its family root: one of `unit`
    /// equals this many root units.
    pub fn factor_to_root(&self, unit: &QuantityUnit) -> Option<Decimal> {
        let mut factor = Decimal::ONE;
        let mut current = unit.code;
        loop {
            match &self.entry(current).root {
                Some(link) => {
                    factor = factor.checked_mul(link.factor)?;
                    current = link.parent;
                }
                None => return Some(factor),
            }
        }
    }

    /// Rescale both values onto their shared family root.
    ///
    /// Fails when the units belong to different families. With
    /// `strict_same_family` the exponents must also match, the contract
    /// for addition and comparison; multiplication and division relax it
    /// and combine exponents themselves.
    pub fn convert_to_base(
        &self,
        v1: Decimal,
        u1: &QuantityUnit,
        exp1: u8,
        v2: Decimal,
        u2: &QuantityUnit,
        exp2: u8,
        strict_same_family: bool,
    ) -> Option<(Decimal, Decimal, &QuantityUnit)> {
        let root1 = self.root_of(u1);
        let root2 = self.root_of(u2);
        if root1.code != root2.code {
            return None;
        }
        if strict_same_family && exp1 != exp2 {
            return None;
        }
        let f1 = pow_exp(self.factor_to_root(u1)?, exp1)?;
        let f2 = pow_exp(self.factor_to_root(u2)?, exp2)?;
        let scaled1 = v1.checked_mul(f1)?;
        let scaled2 = v2.checked_mul(f2)?;
        trace!(
            "rescaled {v1} {} and {v2} {} onto root {}",
            u1.code, u2.code, root1.code
        );
        Some((scaled1, scaled2, root1))
    }

    /// Rescale onto the finer of the two units instead of the family
    /// root, keeping results maximally precise. Identical units pass
    /// through unchanged.
    pub fn convert_to_most_granular(
        &self,
        v1: Decimal,
        u1: &QuantityUnit,
        exp1: u8,
        v2: Decimal,
        u2: &QuantityUnit,
        exp2: u8,
    ) -> Option<(Decimal, Decimal, &QuantityUnit)> {
        if u1.code == u2.code {
            return Some((v1, v2, self.entry(u1.code)));
        }
        if self.root_of(u1).code != self.root_of(u2).code {
            return None;
        }
        let f1 = self.factor_to_root(u1)?;
        let f2 = self.factor_to_root(u2)?;
        // Multiply before dividing so exact chains stay exact
        if f1 <= f2 {
            // u1 is finer; bring v2 onto it
            let scaled = v2
                .checked_mul(pow_exp(f2, exp2)?)?
                .checked_div(pow_exp(f1, exp2)?)?;
            trace!("converted {v2} {} to {scaled} {}", u2.code, u1.code);
            Some((v1, scaled, self.entry(u1.code)))
        } else {
            let scaled = v1
                .checked_mul(pow_exp(f1, exp1)?)?
                .checked_div(pow_exp(f2, exp1)?)?;
            trace!("converted {v1} {} to {scaled} {}", u1.code, u2.code);
            Some((scaled, v2, self.entry(u2.code)))
        }
    }
}
