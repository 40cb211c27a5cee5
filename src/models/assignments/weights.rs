//! 课程权重预算：同一课程所有作业的权重之和不超过 100

use rust_decimal::Decimal;
use serde::Serialize;

pub fn full_weight() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// 课程权重汇总
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeightSummary {
    pub subject_id: i64,
    pub total_weight: Decimal,
    pub available_weight: Decimal,
    pub complete: bool,
}

impl WeightSummary {
    pub fn new(subject_id: i64, total_weight: Decimal) -> Self {
        Self {
            subject_id,
            total_weight,
            available_weight: (full_weight() - total_weight).max(Decimal::ZERO),
            complete: total_weight == full_weight(),
        }
    }
}

/// 超出预算
#[derive(Debug, Clone, PartialEq)]
pub struct WeightBudgetExceeded {
    pub current_total: Decimal,
    pub requested: Decimal,
    pub available: Decimal,
}

impl std::fmt::Display for WeightBudgetExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "权重超出课程预算：当前合计 {}%，本次 {}%，剩余可用 {}%",
            self.current_total.normalize(),
            self.requested.normalize(),
            self.available.normalize()
        )
    }
}

/// `other_total` 为同课程其他作业的权重之和（不含本作业）
pub fn check_weight_budget(
    other_total: Decimal,
    requested: Decimal,
) -> Result<(), WeightBudgetExceeded> {
    if other_total + requested > full_weight() {
        return Err(WeightBudgetExceeded {
            current_total: other_total,
            requested,
            available: (full_weight() - other_total).max(Decimal::ZERO),
        });
    }
    Ok(())
}

/// 单个权重必须在 (0, 100] 之间
pub fn is_valid_weight(weight: Decimal) -> bool {
    weight > Decimal::ZERO && weight <= full_weight()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_budget_allows_exact_hundred() {
        assert!(check_weight_budget(dec!(60), dec!(40)).is_ok());
        assert!(check_weight_budget(dec!(0), dec!(100)).is_ok());
    }

    #[test]
    fn test_budget_rejects_overflow_with_details() {
        let err = check_weight_budget(dec!(70), dec!(40)).unwrap_err();
        assert_eq!(err.available, dec!(30));
        let message = err.to_string();
        assert!(message.contains("70"));
        assert!(message.contains("40"));
        assert!(message.contains("30"));
    }

    #[test]
    fn test_summary() {
        let s = WeightSummary::new(1, dec!(100));
        assert!(s.complete);
        assert_eq!(s.available_weight, Decimal::ZERO);
        let s = WeightSummary::new(1, dec!(35.5));
        assert!(!s.complete);
        assert_eq!(s.available_weight, dec!(64.5));
    }

    #[test]
    fn test_weight_range() {
        assert!(is_valid_weight(dec!(0.5)));
        assert!(!is_valid_weight(Decimal::ZERO));
        assert!(!is_valid_weight(dec!(100.01)));
    }
}
