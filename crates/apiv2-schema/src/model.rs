//! Typed query documents
//!
//! A strongly-typed mirror of the query grammar. Conversion from JSON
//! validates against the embedded schema first, so a document that converts
//! is one the schema accepts; serializing gives back the same JSON shape.

use core::fmt::{self, Display};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::SchemaError;
use crate::query::validate_query;
use crate::validate::ValidationError;

const CUSTOM_PROPERTY_PREFIX: &str = "event:props:";
const GOAL_DIMENSION: &str = "event:goal";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Query document is invalid ({} violation(s))", .0.len())]
    Invalid(Vec<ValidationError>),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Failed to read query document: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// A query against the Stats API v2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDocument {
    pub site_id: String,
    pub metrics: Vec<Metric>,
    pub date_range: DateRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<Dimension>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<OrderBy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Include>,
}

impl QueryDocument {
    /// Validate `value` against the query schema and convert it.
    pub fn from_value(value: &Value) -> Result<Self, QueryError> {
        let output = validate_query(value)?;
        if !output.is_valid {
            return Err(QueryError::Invalid(output.errors));
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Parse and validate a query document from JSON text.
pub fn parse_query(text: &str) -> Result<QueryDocument, QueryError> {
    let value: Value = serde_json::from_str(text)?;
    QueryDocument::from_value(&value)
}

// =============================================================================
// Metric
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Visitors,
    Visits,
    Pageviews,
    ViewsPerVisit,
    BounceRate,
    VisitDuration,
    Events,
    Percentage,
    ConversionRate,
    GroupConversionRate,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Visitors,
        Metric::Visits,
        Metric::Pageviews,
        Metric::ViewsPerVisit,
        Metric::BounceRate,
        Metric::VisitDuration,
        Metric::Events,
        Metric::Percentage,
        Metric::ConversionRate,
        Metric::GroupConversionRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Visitors => "visitors",
            Metric::Visits => "visits",
            Metric::Pageviews => "pageviews",
            Metric::ViewsPerVisit => "views_per_visit",
            Metric::BounceRate => "bounce_rate",
            Metric::VisitDuration => "visit_duration",
            Metric::Events => "events",
            Metric::Percentage => "percentage",
            Metric::ConversionRate => "conversion_rate",
            Metric::GroupConversionRate => "group_conversion_rate",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.as_str() == token)
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DateRange
// =============================================================================

/// A preset period or an explicit `[start, end]` pair of `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DateRangeRepr", into = "DateRangeRepr")]
pub enum DateRange {
    All,
    Day,
    Last7Days,
    Last30Days,
    Month,
    Last6Months,
    Last12Months,
    Year,
    Custom { start: String, end: String },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DateRangeRepr {
    Preset(String),
    Custom(String, String),
}

impl DateRange {
    const PRESETS: [(&'static str, DateRange); 8] = [
        ("all", DateRange::All),
        ("day", DateRange::Day),
        ("7d", DateRange::Last7Days),
        ("30d", DateRange::Last30Days),
        ("month", DateRange::Month),
        ("6mo", DateRange::Last6Months),
        ("12mo", DateRange::Last12Months),
        ("year", DateRange::Year),
    ];

    /// The preset token, or `None` for a custom range.
    pub fn preset_token(&self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, preset)| preset == self)
            .map(|(token, _)| *token)
    }
}

impl TryFrom<DateRangeRepr> for DateRange {
    type Error = String;

    fn try_from(repr: DateRangeRepr) -> Result<Self, Self::Error> {
        match repr {
            DateRangeRepr::Preset(token) => Self::PRESETS
                .iter()
                .find(|(name, _)| *name == token)
                .map(|(_, preset)| preset.clone())
                .ok_or_else(|| format!("unknown date range `{token}`")),
            DateRangeRepr::Custom(start, end) => Ok(DateRange::Custom { start, end }),
        }
    }
}

impl From<DateRange> for DateRangeRepr {
    fn from(range: DateRange) -> Self {
        match range {
            DateRange::Custom { start, end } => DateRangeRepr::Custom(start, end),
            preset => DateRangeRepr::Preset(preset.preset_token().unwrap_or_default().to_string()),
        }
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// Event and visit properties that can be grouped and filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleDimension {
    EventName,
    EventPage,
    EventHostname,
    VisitSource,
    VisitReferrer,
    VisitUtmMedium,
    VisitUtmSource,
    VisitUtmCampaign,
    VisitUtmContent,
    VisitUtmTerm,
    VisitScreen,
    VisitDevice,
    VisitBrowser,
    VisitBrowserVersion,
    VisitOs,
    VisitOsVersion,
    VisitCountry,
    VisitRegion,
    VisitCity,
    VisitEntryPage,
    VisitExitPage,
    VisitEntryPageHostname,
    VisitExitPageHostname,
}

impl SimpleDimension {
    pub const ALL: [SimpleDimension; 23] = [
        SimpleDimension::EventName,
        SimpleDimension::EventPage,
        SimpleDimension::EventHostname,
        SimpleDimension::VisitSource,
        SimpleDimension::VisitReferrer,
        SimpleDimension::VisitUtmMedium,
        SimpleDimension::VisitUtmSource,
        SimpleDimension::VisitUtmCampaign,
        SimpleDimension::VisitUtmContent,
        SimpleDimension::VisitUtmTerm,
        SimpleDimension::VisitScreen,
        SimpleDimension::VisitDevice,
        SimpleDimension::VisitBrowser,
        SimpleDimension::VisitBrowserVersion,
        SimpleDimension::VisitOs,
        SimpleDimension::VisitOsVersion,
        SimpleDimension::VisitCountry,
        SimpleDimension::VisitRegion,
        SimpleDimension::VisitCity,
        SimpleDimension::VisitEntryPage,
        SimpleDimension::VisitExitPage,
        SimpleDimension::VisitEntryPageHostname,
        SimpleDimension::VisitExitPageHostname,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimpleDimension::EventName => "event:name",
            SimpleDimension::EventPage => "event:page",
            SimpleDimension::EventHostname => "event:hostname",
            SimpleDimension::VisitSource => "visit:source",
            SimpleDimension::VisitReferrer => "visit:referrer",
            SimpleDimension::VisitUtmMedium => "visit:utm_medium",
            SimpleDimension::VisitUtmSource => "visit:utm_source",
            SimpleDimension::VisitUtmCampaign => "visit:utm_campaign",
            SimpleDimension::VisitUtmContent => "visit:utm_content",
            SimpleDimension::VisitUtmTerm => "visit:utm_term",
            SimpleDimension::VisitScreen => "visit:screen",
            SimpleDimension::VisitDevice => "visit:device",
            SimpleDimension::VisitBrowser => "visit:browser",
            SimpleDimension::VisitBrowserVersion => "visit:browser_version",
            SimpleDimension::VisitOs => "visit:os",
            SimpleDimension::VisitOsVersion => "visit:os_version",
            SimpleDimension::VisitCountry => "visit:country",
            SimpleDimension::VisitRegion => "visit:region",
            SimpleDimension::VisitCity => "visit:city",
            SimpleDimension::VisitEntryPage => "visit:entry_page",
            SimpleDimension::VisitExitPage => "visit:exit_page",
            SimpleDimension::VisitEntryPageHostname => "visit:entry_page_hostname",
            SimpleDimension::VisitExitPageHostname => "visit:exit_page_hostname",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dimension| dimension.as_str() == token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dimension {
    Simple(SimpleDimension),
    /// `event:props:<name>`; holds `<name>`
    CustomProperty(String),
    /// `event:goal`
    Goal,
}

impl Dimension {
    pub fn parse(token: &str) -> Option<Self> {
        if token == GOAL_DIMENSION {
            return Some(Dimension::Goal);
        }
        if let Some(name) = token.strip_prefix(CUSTOM_PROPERTY_PREFIX) {
            return Some(Dimension::CustomProperty(name.to_string()));
        }
        SimpleDimension::from_token(token).map(Dimension::Simple)
    }

    pub fn is_goal(&self) -> bool {
        matches!(self, Dimension::Goal)
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Simple(dimension) => f.write_str(dimension.as_str()),
            Dimension::CustomProperty(name) => write!(f, "{CUSTOM_PROPERTY_PREFIX}{name}"),
            Dimension::Goal => f.write_str(GOAL_DIMENSION),
        }
    }
}

impl TryFrom<String> for Dimension {
    type Error = String;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Dimension::parse(&token).ok_or_else(|| format!("unknown dimension `{token}`"))
    }
}

impl From<Dimension> for String {
    fn from(dimension: Dimension) -> Self {
        dimension.to_string()
    }
}

// =============================================================================
// Filter
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperation {
    Is,
    IsNot,
    Contains,
    DoesNotContain,
}

/// `[operation, dimension, clauses]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "(FilterOperation, Dimension, Vec<String>)",
    into = "(FilterOperation, Dimension, Vec<String>)"
)]
pub struct Filter {
    pub operation: FilterOperation,
    pub dimension: Dimension,
    pub clauses: Vec<String>,
}

impl From<(FilterOperation, Dimension, Vec<String>)> for Filter {
    fn from((operation, dimension, clauses): (FilterOperation, Dimension, Vec<String>)) -> Self {
        Filter {
            operation,
            dimension,
            clauses,
        }
    }
}

impl From<Filter> for (FilterOperation, Dimension, Vec<String>) {
    fn from(filter: Filter) -> Self {
        (filter.operation, filter.dimension, filter.clauses)
    }
}

// =============================================================================
// OrderBy
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderKey {
    Metric(Metric),
    Dimension(Dimension),
}

impl TryFrom<String> for OrderKey {
    type Error = String;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        if let Some(metric) = Metric::from_token(&token) {
            return Ok(OrderKey::Metric(metric));
        }
        Dimension::try_from(token).map(OrderKey::Dimension)
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        match key {
            OrderKey::Metric(metric) => metric.as_str().to_string(),
            OrderKey::Dimension(dimension) => dimension.to_string(),
        }
    }
}

/// `[key, direction, ...]`. The grammar fixes neither the entry length nor
/// a minimum, so every position is optional and items past the direction are
/// kept as written. `key` is `None` only for an empty entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub struct OrderBy {
    pub key: Option<OrderKey>,
    pub direction: Option<Direction>,
    pub rest: Vec<Value>,
}

impl OrderBy {
    pub fn new(key: OrderKey, direction: Option<Direction>) -> Self {
        OrderBy {
            key: Some(key),
            direction,
            rest: Vec::new(),
        }
    }
}

impl TryFrom<Vec<Value>> for OrderBy {
    type Error = String;

    fn try_from(entry: Vec<Value>) -> Result<Self, Self::Error> {
        let mut entry = entry.into_iter();
        let key = entry
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| e.to_string())?;
        let direction = entry
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| e.to_string())?;
        Ok(OrderBy {
            key,
            direction,
            rest: entry.collect(),
        })
    }
}

impl From<OrderBy> for Vec<Value> {
    fn from(order: OrderBy) -> Self {
        let mut entry = Vec::with_capacity(2 + order.rest.len());
        if let Some(key) = order.key {
            entry.push(Value::String(key.into()));
        }
        if let Some(direction) = order.direction {
            let direction = match direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            entry.push(Value::String(direction.to_string()));
        }
        entry.extend(order.rest);
        entry
    }
}

// =============================================================================
// Include
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Include {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_labels: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<bool>,
    /// Members the grammar leaves open
    #[serde(flatten)]
    pub other: IndexMap<String, Value>,
}
