//! Attribute registry
//!
//! Every widget keeps its configuration in an [`AttributeRegistry`]: an
//! ordered map from attribute name to value, where each attribute has a
//! default, an optional category and an optional custom setter. Attributes
//! in the [`Category::Dimension`] category take part in uniform resizing.
//!
//! Fluent setters are generated at compile time with [`attribute_setters!`];
//! each one writes into the registry and returns the widget.

use std::fmt;
use std::rc::Rc;

use adt_charts::XValue;
use adt_core::Host;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WidgetError};

/// Attribute categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Sizes and offsets scaled by `resize`
    Dimension,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Px,
    Percent,
}

impl Unit {
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Percent => "%",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "px" | "" => Some(Unit::Px),
            "%" | "percent" => Some(Unit::Percent),
            _ => None,
        }
    }
}

/// A signed offset. Negative values are measured from the far edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub value: f64,
    pub unit: Unit,
}

impl Position {
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    pub fn css(&self) -> String {
        format!("{}{}", self.value.abs(), self.unit.suffix())
    }
}

/// Per-side numbers (margins)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    fn scale(&mut self, factor: f64) {
        self.top *= factor;
        self.right *= factor;
        self.bottom *= factor;
        self.left *= factor;
    }
}

/// Per-side CSS border declarations; `None` means no border
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Borders {
    pub top: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
}

impl Borders {
    pub fn all(css: impl Into<String>) -> Self {
        let css = css.into();
        Self {
            top: Some(css.clone()),
            right: Some(css.clone()),
            bottom: Some(css.clone()),
            left: Some(css),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> {
        [
            ("top", self.top.as_deref()),
            ("right", self.right.as_deref()),
            ("bottom", self.bottom.as_deref()),
            ("left", self.left.as_deref()),
        ]
        .into_iter()
    }
}

const PALETTE: [&str; 6] = [
    "#5aa6ff", "#f28c59", "#66d98c", "#e6bf40", "#bf8cf2", "#40ccd9",
];

/// Either one colour for everything or one colour per series
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Colors {
    Single(String),
    PerSeries(IndexMap<String, String>),
}

impl Colors {
    /// Colour for a series, falling back to a fixed palette by index
    pub fn for_series(&self, key: &str, index: usize) -> String {
        match self {
            Colors::Single(c) => c.clone(),
            Colors::PerSeries(map) => map
                .get(key)
                .cloned()
                .unwrap_or_else(|| PALETTE[index % PALETTE.len()].to_string()),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Colors::PerSeries(IndexMap::new())
    }
}

/// What a pointer interaction hit
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
    pub widget: String,
    pub series: Option<String>,
    pub x: Option<XValue>,
    pub value: Option<f64>,
    pub pointer: Option<(f32, f32)>,
}

pub type Formatter = Rc<dyn Fn(f64) -> String>;
pub type Callback = Rc<dyn Fn(&Host, &Interaction)>;

/// Transforms the value passed to a setter (plus extra arguments) into the
/// value that gets stored.
pub type SetterFn = Rc<dyn Fn(AttrValue, &[AttrValue]) -> Result<AttrValue>>;

#[derive(Clone)]
pub enum AttrValue {
    None,
    Number(f64),
    Text(String),
    Bool(bool),
    Position(Position),
    Sides(Sides),
    Borders(Borders),
    Colors(Colors),
    Formatter(Formatter),
    Callback(Callback),
}

impl AttrValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrValue::None => "nothing",
            AttrValue::Number(_) => "a number",
            AttrValue::Text(_) => "text",
            AttrValue::Bool(_) => "a flag",
            AttrValue::Position(_) => "a position",
            AttrValue::Sides(_) => "per-side numbers",
            AttrValue::Borders(_) => "borders",
            AttrValue::Colors(_) => "colors",
            AttrValue::Formatter(_) => "a formatter",
            AttrValue::Callback(_) => "a callback",
        }
    }

    fn same_kind(&self, other: &AttrValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Multiply numeric content in place. Percent positions are left alone.
    fn scale(&mut self, factor: f64) -> bool {
        match self {
            AttrValue::Number(v) => *v *= factor,
            AttrValue::Position(p) if p.unit == Unit::Px => p.value *= factor,
            AttrValue::Sides(s) => s.scale(factor),
            _ => return false,
        }
        true
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::None => f.write_str("None"),
            AttrValue::Number(v) => f.debug_tuple("Number").field(v).finish(),
            AttrValue::Text(v) => f.debug_tuple("Text").field(v).finish(),
            AttrValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            AttrValue::Position(v) => f.debug_tuple("Position").field(v).finish(),
            AttrValue::Sides(v) => f.debug_tuple("Sides").field(v).finish(),
            AttrValue::Borders(v) => f.debug_tuple("Borders").field(v).finish(),
            AttrValue::Colors(v) => f.debug_tuple("Colors").field(v).finish(),
            AttrValue::Formatter(_) => f.write_str("Formatter(..)"),
            AttrValue::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<Position> for AttrValue {
    fn from(v: Position) -> Self {
        AttrValue::Position(v)
    }
}

impl From<Sides> for AttrValue {
    fn from(v: Sides) -> Self {
        AttrValue::Sides(v)
    }
}

impl From<Borders> for AttrValue {
    fn from(v: Borders) -> Self {
        AttrValue::Borders(v)
    }
}

impl From<Colors> for AttrValue {
    fn from(v: Colors) -> Self {
        AttrValue::Colors(v)
    }
}

struct Attribute {
    value: AttrValue,
    default: AttrValue,
    setter: Option<SetterFn>,
}

#[derive(Default)]
pub struct AttributeRegistry {
    attrs: IndexMap<String, Attribute>,
    categories: FxHashMap<Category, Vec<String>>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an attribute. Names are unique per registry.
    pub fn add(
        &mut self,
        name: &str,
        default: impl Into<AttrValue>,
        category: Option<Category>,
        setter: Option<SetterFn>,
    ) -> Result<()> {
        if self.attrs.contains_key(name) {
            return Err(WidgetError::DuplicateAttribute(name.to_string()));
        }
        let default = default.into();
        self.attrs.insert(
            name.to_string(),
            Attribute {
                value: default.clone(),
                default,
                setter,
            },
        );
        if let Some(category) = category {
            self.categories
                .entry(category)
                .or_default()
                .push(name.to_string());
        }
        Ok(())
    }

    /// Replace the default (and current value) of an inherited attribute,
    /// keeping its category and setter.
    pub fn redeclare(&mut self, name: &str, default: impl Into<AttrValue>) -> Result<()> {
        let attr = self
            .attrs
            .get_mut(name)
            .ok_or_else(|| WidgetError::UnknownAttribute(name.to_string()))?;
        let default = default.into();
        attr.value = default.clone();
        attr.default = default;
        Ok(())
    }

    /// Assign through the custom setter when one is declared, plainly
    /// otherwise. Plain assignment keeps the kind of the default.
    pub fn set(&mut self, name: &str, value: AttrValue, extra: &[AttrValue]) -> Result<()> {
        let attr = self
            .attrs
            .get_mut(name)
            .ok_or_else(|| WidgetError::UnknownAttribute(name.to_string()))?;
        let value = match &attr.setter {
            Some(setter) => setter(value, extra)?,
            None => value,
        };
        let compatible = value.same_kind(&attr.default)
            || matches!(value, AttrValue::None)
            || matches!(attr.default, AttrValue::None);
        if !compatible {
            return Err(WidgetError::TypeMismatch {
                name: name.to_string(),
                expected: attr.default.kind_name(),
                found: value.kind_name(),
            });
        }
        attr.value = value;
        Ok(())
    }

    pub fn reset(&mut self, name: &str) -> Result<()> {
        let attr = self
            .attrs
            .get_mut(name)
            .ok_or_else(|| WidgetError::UnknownAttribute(name.to_string()))?;
        attr.value = attr.default.clone();
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name).map(|a| &a.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    pub fn category_members(&self, category: Category) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Multiply every numeric member of `category` by `factor`. Returns how
    /// many attributes changed.
    pub fn scale_category(&mut self, category: Category, factor: f64) -> usize {
        let Some(members) = self.categories.get(&category) else {
            return 0;
        };
        let mut scaled = 0;
        for name in members {
            if let Some(attr) = self.attrs.get_mut(name) {
                if attr.value.scale(factor) {
                    scaled += 1;
                }
            }
        }
        scaled
    }

    fn lookup(&self, name: &str) -> Result<&AttrValue> {
        self.get(name)
            .ok_or_else(|| WidgetError::UnknownAttribute(name.to_string()))
    }

    fn mismatch(name: &str, expected: &'static str, found: &AttrValue) -> WidgetError {
        WidgetError::TypeMismatch {
            name: name.to_string(),
            expected,
            found: found.kind_name(),
        }
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        match self.lookup(name)? {
            AttrValue::Number(v) => Ok(*v),
            other => Err(Self::mismatch(name, "a number", other)),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        match self.lookup(name)? {
            AttrValue::Text(v) => Ok(v),
            other => Err(Self::mismatch(name, "text", other)),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.lookup(name)? {
            AttrValue::Bool(v) => Ok(*v),
            other => Err(Self::mismatch(name, "a flag", other)),
        }
    }

    pub fn position(&self, name: &str) -> Result<Position> {
        match self.lookup(name)? {
            AttrValue::Position(v) => Ok(*v),
            other => Err(Self::mismatch(name, "a position", other)),
        }
    }

    pub fn sides(&self, name: &str) -> Result<Sides> {
        match self.lookup(name)? {
            AttrValue::Sides(v) => Ok(*v),
            other => Err(Self::mismatch(name, "per-side numbers", other)),
        }
    }

    pub fn borders(&self, name: &str) -> Result<&Borders> {
        match self.lookup(name)? {
            AttrValue::Borders(v) => Ok(v),
            other => Err(Self::mismatch(name, "borders", other)),
        }
    }

    pub fn colors(&self, name: &str) -> Result<&Colors> {
        match self.lookup(name)? {
            AttrValue::Colors(v) => Ok(v),
            other => Err(Self::mismatch(name, "colors", other)),
        }
    }

    pub fn formatter(&self, name: &str) -> Result<Formatter> {
        match self.lookup(name)? {
            AttrValue::Formatter(v) => Ok(v.clone()),
            other => Err(Self::mismatch(name, "a formatter", other)),
        }
    }

    /// Unset callbacks read as `None`
    pub fn callback(&self, name: &str) -> Result<Option<Callback>> {
        match self.lookup(name)? {
            AttrValue::Callback(v) => Ok(Some(v.clone())),
            AttrValue::None => Ok(None),
            other => Err(Self::mismatch(name, "a callback", other)),
        }
    }
}

/// Setter for positions: accepts a `Position`, or a number followed by a
/// unit given as `Text("px" | "%")`.
pub fn position_setter() -> SetterFn {
    Rc::new(|value, extra| match value {
        AttrValue::Position(p) => Ok(AttrValue::Position(p)),
        AttrValue::Number(v) => {
            let unit = match extra.first() {
                Some(AttrValue::Text(u)) => Unit::parse(u).ok_or_else(|| {
                    WidgetError::TypeMismatch {
                        name: "unit".to_string(),
                        expected: "`px` or `%`",
                        found: "text",
                    }
                })?,
                Some(other) => {
                    return Err(WidgetError::TypeMismatch {
                        name: "unit".to_string(),
                        expected: "text",
                        found: other.kind_name(),
                    })
                }
                None => Unit::Px,
            };
            Ok(AttrValue::Position(Position { value: v, unit }))
        }
        other => Ok(other),
    })
}

/// Generate fluent setters that write into a widget's attribute registry.
///
/// The `impl` form adds inherent methods to one widget type; the `trait`
/// form declares a trait whose methods are available on every
/// [`Lifecycle`](crate::lifecycle::Lifecycle) implementor.
///
/// ```ignore
/// attribute_setters! {
///     impl BarChart {
///         /// Gap between grouped bars
///         bar_gap(value: f64) => "bar_gap", AttrValue::Number(value);
///     }
/// }
/// ```
#[macro_export]
macro_rules! attribute_setters {
    (
        impl $ty:ty {
            $(
                $(#[$meta:meta])*
                $method:ident ( $($arg:ident : $argty:ty),* ) => $name:literal, $value:expr;
            )*
        }
    ) => {
        impl $ty {
            $(
                $(#[$meta])*
                pub fn $method(&mut self, $($arg: $argty),*) -> &mut Self {
                    $crate::lifecycle::Lifecycle::core_mut(self).set_or_warn($name, $value);
                    self
                }
            )*
        }
    };
    (
        $(#[$tmeta:meta])*
        pub trait $trait_name:ident {
            $(
                $(#[$meta:meta])*
                $method:ident ( $($arg:ident : $argty:ty),* ) => $name:literal, $value:expr;
            )*
        }
    ) => {
        $(#[$tmeta])*
        pub trait $trait_name: $crate::lifecycle::Lifecycle + Sized {
            $(
                $(#[$meta])*
                fn $method(&mut self, $($arg: $argty),*) -> &mut Self {
                    $crate::lifecycle::Lifecycle::core_mut(self).set_or_warn($name, $value);
                    self
                }
            )*
        }

        impl<T: $crate::lifecycle::Lifecycle + Sized> $trait_name for T {}
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AttributeRegistry {
        let mut r = AttributeRegistry::new();
        r.add("width", 200.0, Some(Category::Dimension), None).unwrap();
        r.add("x", Position::px(0.0), Some(Category::Dimension), Some(position_setter()))
            .unwrap();
        r.add("margins", Sides::uniform(4.0), Some(Category::Dimension), None)
            .unwrap();
        r.add("label", "", None, None).unwrap();
        r
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut r = registry();
        let err = r.add("width", 10.0, None, None).unwrap_err();
        assert!(matches!(err, WidgetError::DuplicateAttribute(n) if n == "width"));
        assert_eq!(r.category_members(Category::Dimension).len(), 3);
    }

    #[test]
    fn redeclare_changes_default_and_keeps_category() {
        let mut r = registry();
        r.redeclare("width", 320.0).unwrap();
        assert_eq!(r.number("width").unwrap(), 320.0);
        r.set("width", 10.0.into(), &[]).unwrap();
        r.reset("width").unwrap();
        assert_eq!(r.number("width").unwrap(), 320.0);
        assert!(r
            .category_members(Category::Dimension)
            .contains(&"width".to_string()));
    }

    #[test]
    fn custom_setter_receives_extra_arguments() {
        let mut r = registry();
        r.set("x", 50.0.into(), &["%".into()]).unwrap();
        assert_eq!(r.position("x").unwrap(), Position::percent(50.0));
        r.set("x", 12.0.into(), &[]).unwrap();
        assert_eq!(r.position("x").unwrap(), Position::px(12.0));
        assert!(r.set("x", 1.0.into(), &["em".into()]).is_err());
    }

    #[test]
    fn plain_assignment_checks_kind() {
        let mut r = registry();
        let err = r.set("width", "wide".into(), &[]).unwrap_err();
        assert!(matches!(err, WidgetError::TypeMismatch { .. }));
        assert!(r.set("nope", 1.0.into(), &[]).is_err());
    }

    #[test]
    fn scale_category_skips_percent_positions() {
        let mut r = registry();
        r.set("x", AttrValue::Position(Position::percent(50.0)), &[])
            .unwrap();
        assert_eq!(r.scale_category(Category::Dimension, 2.0), 2);
        assert_eq!(r.number("width").unwrap(), 400.0);
        assert_eq!(r.sides("margins").unwrap(), Sides::uniform(8.0));
        assert_eq!(r.position("x").unwrap(), Position::percent(50.0));
    }

    #[test]
    fn unknown_category_has_no_members() {
        let r = AttributeRegistry::new();
        assert!(r.category_members(Category::Dimension).is_empty());
    }

    #[test]
    fn colors_fall_back_to_palette() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), "red".to_string());
        let c = Colors::PerSeries(map);
        assert_eq!(c.for_series("a", 3), "red");
        assert_eq!(c.for_series("b", 1), PALETTE[1]);
        assert_eq!(Colors::Single("blue".into()).for_series("z", 0), "blue");
    }
}
