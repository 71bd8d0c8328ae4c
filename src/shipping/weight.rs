use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::models::{CartLine, WeightUnit};

/// Mass assumed for a line that declares no weight (a 250 g bag).
pub fn fallback_item_kg() -> Decimal {
    Decimal::new(250, 3)
}

/// `None` when the conversion overflows.
pub fn to_kg(value: Decimal, unit: WeightUnit) -> Option<Decimal> {
    let factor = match unit {
        WeightUnit::Kg => return Some(value),
        WeightUnit::G => Decimal::new(1, 3),
        WeightUnit::Lb => Decimal::new(45_359_237, 8),
        WeightUnit::Oz => Decimal::new(28_349_523_125, 12),
    };
    value.checked_mul(factor)
}

fn item_kg(line: &CartLine) -> Decimal {
    match line.weight {
        Some(weight) if weight > Decimal::ZERO => {
            to_kg(weight, line.weight_unit.unwrap_or(WeightUnit::G)).unwrap_or(Decimal::MAX)
        }
        _ => fallback_item_kg(),
    }
}

/// Whole kilograms billed by the carrier: total cart mass rounded up, never
/// less than one. Saturates rather than overflowing on absurd input.
pub fn chargeable_weight_kg(lines: &[CartLine]) -> u32 {
    let total = lines.iter().fold(Decimal::ZERO, |acc, line| {
        acc.saturating_add(item_kg(line).saturating_mul(Decimal::from(line.quantity)))
    });
    total.ceil().to_u32().unwrap_or(u32::MAX).max(1)
}
