//! Query criteria: the pincode, the three categorical selectors and the result limit.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::types::{Workshop, BODY_SHOP, CHANNEL, STATE};

/// The sentinel selector text meaning "no constraint".
pub const ALL: &str = "All";

/// Number of rows a pincode lookup returns when no limit is given.
pub const DEFAULT_LIMIT: usize = 5;

/// One of the three categorical columns a query can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    /// The `channel` column.
    Channel,
    /// The `body shop` column.
    BodyShop,
    /// The `state` column.
    State,
}

impl CategoricalField {
    /// All categorical fields, in display order.
    pub const ALL: [CategoricalField; 3] = [Self::Channel, Self::BodyShop, Self::State];

    /// Normalized column name of this field.
    pub fn column(self) -> &'static str {
        match self {
            Self::Channel => CHANNEL,
            Self::BodyShop => BODY_SHOP,
            Self::State => STATE,
        }
    }

    /// The record's value for this field.
    pub fn value(self, workshop: &Workshop) -> Option<&str> {
        match self {
            Self::Channel => workshop.channel.as_deref(),
            Self::BodyShop => workshop.body_shop.as_deref(),
            Self::State => workshop.state.as_deref(),
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A categorical filter: either no constraint, or exact equality with a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selector {
    /// No constraint ("All").
    #[default]
    All,
    /// Keep rows whose field equals this value exactly (case-sensitive).
    Only(String),
}

impl Selector {
    /// Constrain to `value`.
    pub fn only(value: impl Into<String>) -> Self {
        Self::Only(value.into())
    }

    /// Parse selector text. Exactly `"All"` is the sentinel; any other text is a concrete value.
    pub fn parse(raw: &str) -> Self {
        if raw == ALL {
            Self::All
        } else {
            Self::Only(raw.to_string())
        }
    }

    /// Returns `true` for [`Selector::All`].
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether a field value passes this selector. A null field never equals a concrete value.
    pub fn matches(&self, field: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(want) => field == Some(want.as_str()),
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(v) => f.write_str(v),
        }
    }
}

/// What a pincode lookup returns when no record carries the requested pincode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PincodeMissPolicy {
    /// Return the first `limit` rows of the whole dataset.
    #[default]
    LeadingRows,
    /// Return no rows.
    Empty,
}

/// Everything a [`super::query`] needs besides the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    /// Pincode to look up. `None` (or an empty string) means no pincode filter.
    pub pincode: Option<String>,
    /// Channel selector.
    pub channel: Selector,
    /// Body-shop selector.
    pub body_shop: Selector,
    /// State selector.
    pub state: Selector,
    /// Maximum number of rows the pincode lookup returns.
    pub limit: usize,
    /// Behavior when the pincode matches nothing.
    pub on_miss: PincodeMissPolicy,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            pincode: None,
            channel: Selector::All,
            body_shop: Selector::All,
            state: Selector::All,
            limit: DEFAULT_LIMIT,
            on_miss: PincodeMissPolicy::default(),
        }
    }
}

impl Criteria {
    /// Criteria with no constraints and the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `pincode`. An empty string clears the pincode filter.
    pub fn pincode(mut self, pincode: impl Into<String>) -> Self {
        let pincode = pincode.into();
        self.pincode = (!pincode.is_empty()).then_some(pincode);
        self
    }

    /// Set the channel selector.
    pub fn channel(mut self, selector: impl Into<Selector>) -> Self {
        self.channel = selector.into();
        self
    }

    /// Set the body-shop selector.
    pub fn body_shop(mut self, selector: impl Into<Selector>) -> Self {
        self.body_shop = selector.into();
        self
    }

    /// Set the state selector.
    pub fn state(mut self, selector: impl Into<Selector>) -> Self {
        self.state = selector.into();
        self
    }

    /// Set the pincode lookup limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the pincode miss policy.
    pub fn on_miss(mut self, policy: PincodeMissPolicy) -> Self {
        self.on_miss = policy;
        self
    }

    /// The pincode to look up, if one is set and non-empty.
    pub fn pincode_filter(&self) -> Option<&str> {
        self.pincode.as_deref().filter(|p| !p.is_empty())
    }

    /// The selector for a categorical field.
    pub fn selector(&self, field: CategoricalField) -> &Selector {
        match field {
            CategoricalField::Channel => &self.channel,
            CategoricalField::BodyShop => &self.body_shop,
            CategoricalField::State => &self.state,
        }
    }
}
