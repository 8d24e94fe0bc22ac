use tracing::warn;

use crate::domain::{AmountModel, Confidence, IncentiveProgram, Money, Project, ValueEstimate};

/// Value estimation outcome for one program. A malformed record or an
/// unparseable formula lands here as a zero/default estimate with an
/// explanatory note instead of an error.
#[derive(Debug, Clone)]
pub struct ValueResult {
    pub estimate: ValueEstimate,
    pub confidence: Confidence,
    pub note: Option<String>,
}

impl ValueResult {
    fn exact(amount: f64) -> Self {
        Self {
            estimate: ValueEstimate::from_window(amount, amount, amount),
            confidence: Confidence::High,
            note: None,
        }
    }

    fn zero(note: impl Into<String>) -> Self {
        Self {
            estimate: ValueEstimate::zero(),
            confidence: Confidence::Low,
            note: Some(note.into()),
        }
    }
}

/// Spread applied around basis-derived estimates; cost components carry
/// estimation uncertainty that fixed awards do not.
const BASIS_WINDOW_LOW: f64 = 0.85;
const BASIS_WINDOW_HIGH: f64 = 1.10;

/// Evaluate a program's amount model against the project. Exhaustive over
/// the closed `AmountModel` set; adding a variant fails compilation here
/// until it is handled.
pub fn estimate_value(project: &Project, program: &IncentiveProgram) -> ValueResult {
    match &program.amount {
        AmountModel::Fixed { amount } => {
            if !amount.is_finite() || *amount < 0.0 {
                return malformed(program, "fixed amount is negative or not finite");
            }
            ValueResult::exact(*amount)
        }

        AmountModel::PercentOfBasis { rate, min, max } => {
            if !rate.is_finite() || *rate < 0.0 || *rate > 1.0 {
                return malformed(program, "percent-of-basis rate outside [0, 1]");
            }
            let basis = project.total_cost.as_dollars();
            let lo = min.map(Money::dollars);
            let hi = max.map(Money::dollars);
            let clip = |v: f64| Money::dollars(v).clamp_to(lo, hi).as_dollars();
            let raw = basis * rate;
            ValueResult {
                estimate: ValueEstimate::from_window(
                    clip(raw * BASIS_WINDOW_LOW),
                    clip(raw),
                    clip(raw * BASIS_WINDOW_HIGH),
                ),
                confidence: Confidence::High,
                note: None,
            }
        }

        AmountModel::PerUnit { amount } => {
            per_quantity(program, *amount, project.unit_quantity(), "unit count")
        }

        AmountModel::PerKilowatt { amount } => {
            per_quantity(program, *amount, project.capacity_kw, "nameplate capacity")
        }

        AmountModel::PerKilowattHour { amount } => {
            // Production is a forecast, not a measurement.
            let mut r = per_quantity(
                program,
                *amount,
                project.annual_production_kwh,
                "annual production estimate",
            );
            if r.confidence == Confidence::High {
                r.confidence = Confidence::Medium;
                r.estimate = ValueEstimate::from_window(
                    r.estimate.expected.as_dollars() * BASIS_WINDOW_LOW,
                    r.estimate.expected.as_dollars(),
                    r.estimate.expected.as_dollars() * BASIS_WINDOW_HIGH,
                );
            }
            r
        }

        AmountModel::Formula {
            expression,
            default_value,
        } => match default_value {
            Some(default) if default.is_finite() && *default >= 0.0 => {
                warn!(
                    program_id = %program.id,
                    %expression,
                    "unparseable amount formula, using declared default"
                );
                ValueResult {
                    estimate: ValueEstimate::from_window(0.0, *default, *default),
                    confidence: Confidence::Low,
                    note: Some(format!(
                        "formula '{expression}' not evaluated; declared default used"
                    )),
                }
            }
            _ => malformed(program, "formula model with no usable default value"),
        },
    }
}

fn per_quantity(
    program: &IncentiveProgram,
    amount: f64,
    quantity: Option<f64>,
    quantity_name: &str,
) -> ValueResult {
    if !amount.is_finite() || amount < 0.0 {
        return malformed(program, "per-quantity amount is negative or not finite");
    }
    match quantity {
        Some(q) if q >= 0.0 => ValueResult::exact(amount * q),
        _ => ValueResult::zero(format!("project has no {quantity_name}")),
    }
}

fn malformed(program: &IncentiveProgram, reason: &str) -> ValueResult {
    warn!(program_id = %program.id, reason, "malformed program record, scoring zero value");
    ValueResult::zero(format!("malformed program record: {reason}"))
}
