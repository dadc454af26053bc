//! Receipt
//!
//! The costed breakdown of an order and its console rendering.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{categories::CostingCategory, line_items::LineItem, orders::Order};

/// Errors that can occur when summarising or printing an order result.
#[derive(Debug, Error, PartialEq)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Costed breakdown of an order.
///
/// Line items are ordered: one per parcel in parcel order, then any bulk
/// discounts, then the expedite surcharge if one was requested. The total is
/// the sum of every line item.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderResult<'a> {
    line_items: SmallVec<[LineItem<'a>; 10]>,
    total: Money<'a, Currency>,
}

impl<'a> OrderResult<'a> {
    /// Create a new result from its line items and their total, which must be their sum.
    pub(crate) fn new(line_items: SmallVec<[LineItem<'a>; 10]>, total: Money<'a, Currency>) -> Self {
        Self { line_items, total }
    }

    /// Total amount to pay for the order
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Every line item, in order
    pub fn line_items(&self) -> &[LineItem<'a>] {
        &self.line_items
    }

    /// Currency used for all monetary values
    pub fn currency(&self) -> &'a Currency {
        self.total.currency()
    }

    /// Find the line item pricing the parcel at `parcel_idx`.
    pub fn line_item_for_parcel(&self, parcel_idx: usize) -> Option<&LineItem<'a>> {
        self.line_items
            .iter()
            .find(|item| item.parcel_idx() == Some(parcel_idx))
    }

    /// Line items that bulk discounts produced
    pub fn discounts(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.line_items.iter().filter(|item| item.is_discount())
    }

    /// The expedite surcharge, if expedited handling was requested.
    pub fn expedite_surcharge(&self) -> Option<Money<'a, Currency>> {
        self.line_items
            .iter()
            .find(|item| item.category() == CostingCategory::ExpediteSurcharge)
            .map(|item| *item.cost())
    }

    /// Cost of the parcels before discounts and surcharges.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.sum(LineItem::is_parcel)
    }

    /// Sum of the discount line items; zero or negative.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the addition fails.
    pub fn discount_total(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.sum(LineItem::is_discount)
    }

    /// Amount saved by bulk discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        Money::from_minor(0, self.currency()).sub(self.discount_total()?)
    }

    /// Calculates the savings made by discounts as a percentage of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the savings or subtotal cannot be calculated.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal()?.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        Ok(Percentage::from(
            Decimal::from(savings_minor) / Decimal::from(subtotal_minor),
        ))
    }

    fn sum(&self, include: impl Fn(&LineItem<'a>) -> bool) -> Result<Money<'a, Currency>, MoneyError> {
        self.line_items
            .iter()
            .filter(|item| include(*item))
            .try_fold(Money::from_minor(0, self.currency()), |acc, item| {
                acc.add(*item.cost())
            })
    }

    /// Prints the receipt.
    ///
    /// When the costed `order` is given, parcel rows show its measurements.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be summarised or written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        order: Option<&Order>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Category", "Cost"]);

        let mut discount_rows: SmallVec<[usize; 4]> = SmallVec::new();

        for (row_idx, item) in self.line_items.iter().enumerate() {
            let row = row_idx + 1; // header is row 0

            builder.push_record([
                format!("{row}"),
                describe(item, order),
                item.category().to_string(),
                format!("{}", item.cost()),
            ]);

            if item.is_discount() {
                discount_rows.push(row);
            }
        }

        write_receipt_table(&mut out, builder, &discount_rows)?;

        write_receipt_summary(&mut out, self)
    }
}

/// Human-readable description of a line item.
fn describe(item: &LineItem<'_>, order: Option<&Order>) -> String {
    match item.parcel_idx() {
        Some(parcel_idx) => order
            .and_then(|order| order.get_parcel(parcel_idx))
            .map_or_else(
                || format!("Parcel {}", parcel_idx + 1),
                |parcel| {
                    format!(
                        "Parcel {} ({} x {} x {}, {}kg)",
                        parcel_idx + 1,
                        parcel.height(),
                        parcel.width(),
                        parcel.depth(),
                        parcel.weight()
                    )
                },
            ),
        None if item.is_discount() => "Bulk discount".to_string(),
        None => "Expedited handling".to_string(),
    }
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    discount_rows: &[usize],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..4), Alignment::right());

    // Discounts reduce the total, so their costs are shown in green.
    for &row in discount_rows {
        table.modify((row, 3), Color::FG_GREEN);
    }

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

/// Writes the subtotal, savings, surcharge and total, labels and amounts
/// each right-aligned in their own column.
fn write_receipt_summary(
    out: &mut impl io::Write,
    result: &OrderResult<'_>,
) -> Result<(), ReceiptError> {
    let savings_points = percent_points_from_fractional_percentage(result.savings_percent()?);

    let mut lines: SmallVec<[(&str, String); 4]> = SmallVec::new();

    lines.push(("Subtotal:", result.subtotal()?.to_string()));
    lines.push((
        "Savings:",
        format!("({savings_points:.2}%) {}", result.savings()?),
    ));

    if let Some(surcharge) = result.expedite_surcharge() {
        lines.push(("Expedite:", surcharge.to_string()));
    }

    lines.push(("Total:", result.total().to_string()));

    let label_width = lines
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or_default();

    // Currency symbols can be multi-byte, so widths are counted in chars.
    let value_width = lines
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value) in &lines {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
