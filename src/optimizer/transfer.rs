//! Surplus-to-deficit transfer planning.
//!
//! Single-pass proportional split: each surplus region's share of the total
//! surplus is fixed up front and applied to every deficit region's need
//! independently. Shares are not recomputed as deficits are served and total
//! flow is not capped by the surplus pool, so with several deficits a surplus
//! region can be assigned more than its own gap.

use tracing::debug;

use crate::domain::{RegionKey, RegionLoad, TransferEntry, TransferPlan};
use crate::error::{GridError, GridResult};

/// A region on one side of the balance, with the magnitude of its gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Imbalance {
    pub region: RegionKey,
    pub amount: f64,
}

/// Split regions into surplus (gap > 0) and deficit (gap < 0), keeping input
/// order. Balanced regions land in neither list.
pub fn partition(regions: &[RegionLoad]) -> (Vec<Imbalance>, Vec<Imbalance>) {
    let mut surplus = Vec::new();
    let mut deficit = Vec::new();

    for load in regions {
        let gap = load.gap();
        if gap > 0.0 {
            surplus.push(Imbalance {
                region: load.region,
                amount: gap,
            });
        } else if gap < 0.0 {
            deficit.push(Imbalance {
                region: load.region,
                amount: gap.abs(),
            });
        }
    }

    (surplus, deficit)
}

pub fn plan(regions: &[RegionLoad]) -> GridResult<TransferPlan> {
    if regions.is_empty() {
        return Err(GridError::EmptyInput);
    }

    let (surplus, deficit) = partition(regions);
    let total_surplus: f64 = surplus.iter().map(|s| s.amount).sum();
    let total_deficit: f64 = deficit.iter().map(|d| d.amount).sum();

    let mut entries = Vec::with_capacity(surplus.len() * deficit.len());
    if total_surplus > 0.0 {
        for d in &deficit {
            for s in &surplus {
                let share_ratio = s.amount / total_surplus;
                entries.push(TransferEntry {
                    from: s.region,
                    to: d.region,
                    amount: round2(share_ratio * d.amount),
                });
            }
        }
    }

    debug!(
        regions = regions.len(),
        surplus_regions = surplus.len(),
        deficit_regions = deficit.len(),
        total_surplus,
        total_deficit,
        entries = entries.len(),
        "transfer plan computed"
    );

    Ok(TransferPlan {
        total_surplus,
        total_deficit,
        transfer_plan: entries,
    })
}

/// Round to two decimals by the exact value of `value`, ties to even.
///
/// `value * 100.0` can land on a half even when `value` itself is not a tie
/// (2.675 is stored just below it), so the product's rounding error decides
/// those cases before falling back to ties-to-even.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let residual = value.mul_add(100.0, -scaled);
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 && residual != 0.0 {
        if residual > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        }
    } else {
        scaled.round_ties_even()
    };
    rounded / 100.0
}
