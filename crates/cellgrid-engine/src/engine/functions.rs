//! Built-in spreadsheet functions.
//!
//! Conventions:
//! - Function names are ALL CAPS and take exactly one range argument.
//! - Non-numeric cells count as 0 in `SUM` but are skipped by `AVERAGE`,
//!   `MAX` and `MIN`. `COUNT` counts every non-blank cell, numeric or not.
//! - If you add a function, add its call prefix to `CALL_PREFIXES` in the
//!   position it should be tried.

use super::format::{format_fixed, format_number, is_blank, parse_number};

/// The closed set of functions a formula can call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormulaFn {
    Sum,
    Average,
    Count,
    Max,
    Min,
}

/// Call prefixes in dispatch order; the first match wins.
const CALL_PREFIXES: &[(&str, FormulaFn)] = &[
    ("SUM(", FormulaFn::Sum),
    ("AVERAGE(", FormulaFn::Average),
    ("AVG(", FormulaFn::Average),
    ("COUNT(", FormulaFn::Count),
    ("MAX(", FormulaFn::Max),
    ("MIN(", FormulaFn::Min),
];

impl FormulaFn {
    /// Identify the function an (uppercased) expression starts calling.
    pub fn from_expression(expression: &str) -> Option<FormulaFn> {
        CALL_PREFIXES
            .iter()
            .find(|(prefix, _)| expression.starts_with(prefix))
            .map(|&(_, func)| func)
    }

    pub fn name(self) -> &'static str {
        match self {
            FormulaFn::Sum => "SUM",
            FormulaFn::Average => "AVERAGE",
            FormulaFn::Count => "COUNT",
            FormulaFn::Max => "MAX",
            FormulaFn::Min => "MIN",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FormulaFn::Sum => "Sum of values in a range (text counts as 0)",
            FormulaFn::Average => "Average of numeric values in a range, to 2 decimals",
            FormulaFn::Count => "Count of non-blank cells in a range",
            FormulaFn::Max => "Maximum numeric value in a range",
            FormulaFn::Min => "Minimum numeric value in a range",
        }
    }

    pub fn all() -> [FormulaFn; 5] {
        [
            FormulaFn::Sum,
            FormulaFn::Average,
            FormulaFn::Count,
            FormulaFn::Max,
            FormulaFn::Min,
        ]
    }

    /// Apply the function to the values of its range.
    pub fn apply<S: AsRef<str>>(self, values: &[S]) -> String {
        self.apply_padded(values, 0)
    }

    /// Apply the function to `values` plus `zeros` more cells reading `"0"`
    /// (range cells outside the grid).
    pub fn apply_padded<S: AsRef<str>>(self, values: &[S], zeros: u128) -> String {
        match self {
            FormulaFn::Sum => {
                let sum = values
                    .iter()
                    .fold(0.0, |acc, v| acc + parse_number(v.as_ref()).unwrap_or(0.0));
                format_number(sum)
            }
            FormulaFn::Average => {
                let numbers = numeric_values(values);
                if numbers.is_empty() && zeros == 0 {
                    return "0".to_string();
                }
                let sum = numbers.iter().fold(0.0, |acc, n| acc + n);
                format_fixed(sum / (numbers.len() as f64 + zeros as f64), 2)
            }
            FormulaFn::Count => {
                let non_blank = values.iter().filter(|v| !is_blank(v.as_ref())).count();
                (non_blank as u128).saturating_add(zeros).to_string()
            }
            FormulaFn::Max => extreme(values, zeros, f64::max),
            FormulaFn::Min => extreme(values, zeros, f64::min),
        }
    }
}

fn numeric_values<S: AsRef<str>>(values: &[S]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|v| parse_number(v.as_ref()))
        .filter(|n| !n.is_nan())
        .collect()
}

fn extreme<S: AsRef<str>>(values: &[S], zeros: u128, pick: fn(f64, f64) -> f64) -> String {
    let padding = (zeros > 0).then_some(0.0);
    numeric_values(values)
        .into_iter()
        .chain(padding)
        .reduce(pick)
        .map_or_else(|| "0".to_string(), format_number)
}
