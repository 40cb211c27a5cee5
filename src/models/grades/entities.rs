//! 加权成绩汇总
//!
//! current_grade = Σ(grade × weight / 100)，只统计已评分作业；
//! 未评分作业的权重计入 remaining_weight。

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// 参与计算的一项作业
#[derive(Debug, Clone, Serialize)]
pub struct GradeItem {
    pub assignment_id: i64,
    pub title: String,
    pub weight: Decimal,
    pub grade: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeSummary {
    pub student_id: i64,
    pub subject_id: i64,
    pub current_grade: Decimal,
    pub graded_weight: Decimal,
    pub remaining_weight: Decimal,
    /// 剩余权重上需要的最低平均分；没有剩余权重时为空
    pub required_average: Option<Decimal>,
    pub attainable: bool,
    pub pass_threshold: Decimal,
    pub items: Vec<GradeItem>,
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl GradeSummary {
    pub fn compute(
        student_id: i64,
        subject_id: i64,
        items: Vec<GradeItem>,
        pass_threshold: Decimal,
    ) -> Self {
        let mut current = Decimal::ZERO;
        let mut graded_weight = Decimal::ZERO;
        let mut remaining_weight = Decimal::ZERO;

        for item in &items {
            match item.grade {
                Some(grade) => {
                    current += grade * item.weight / Decimal::ONE_HUNDRED;
                    graded_weight += item.weight;
                }
                None => remaining_weight += item.weight,
            }
        }

        let required_average = if remaining_weight.is_zero() {
            None
        } else {
            let needed = (pass_threshold - current) * Decimal::ONE_HUNDRED / remaining_weight;
            Some(round2(needed.max(Decimal::ZERO)))
        };

        // 没有剩余权重时，是否及格已经确定
        let attainable = match required_average {
            Some(required) => required <= Decimal::ONE_HUNDRED,
            None => current >= pass_threshold,
        };

        Self {
            student_id,
            subject_id,
            current_grade: round2(current),
            graded_weight,
            remaining_weight,
            required_average,
            attainable,
            pass_threshold,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn item(id: i64, weight: Decimal, grade: Option<Decimal>) -> GradeItem {
        GradeItem {
            assignment_id: id,
            title: format!("A{id}"),
            weight,
            grade,
        }
    }

    #[test]
    fn test_alg101_weighted_grade() {
        let summary = GradeSummary::compute(
            1,
            1,
            vec![item(1, dec!(40), Some(dec!(80))), item(2, dec!(60), Some(dec!(70)))],
            dec!(60),
        );
        assert_eq!(summary.current_grade, dec!(74.00));
        assert_eq!(summary.remaining_weight, Decimal::ZERO);
        assert_eq!(summary.graded_weight, dec!(100));
        assert_eq!(summary.required_average, None);
        assert!(summary.attainable);
    }

    #[test]
    fn test_ungraded_weight_is_remaining() {
        let summary = GradeSummary::compute(
            1,
            1,
            vec![item(1, dec!(40), Some(dec!(50))), item(2, dec!(60), None)],
            dec!(60),
        );
        // 40 * 50 / 100 = 20，还需 (60 - 20) * 100 / 60 = 66.67
        assert_eq!(summary.current_grade, dec!(20));
        assert_eq!(summary.remaining_weight, dec!(60));
        assert_eq!(summary.required_average, Some(dec!(66.67)));
        assert!(summary.attainable);
    }

    #[test]
    fn test_required_average_clamped_at_zero() {
        let summary = GradeSummary::compute(
            1,
            1,
            vec![item(1, dec!(80), Some(dec!(100))), item(2, dec!(20), None)],
            dec!(60),
        );
        assert_eq!(summary.required_average, Some(Decimal::ZERO));
    }

    #[test]
    fn test_unattainable() {
        let summary = GradeSummary::compute(
            1,
            1,
            vec![item(1, dec!(80), Some(dec!(10))), item(2, dec!(20), None)],
            dec!(60),
        );
        assert!(summary.required_average.unwrap() > dec!(100));
        assert!(!summary.attainable);
    }

    #[test]
    fn test_no_assignments() {
        let summary = GradeSummary::compute(1, 1, Vec::new(), dec!(60));
        assert_eq!(summary.current_grade, Decimal::ZERO);
        assert_eq!(summary.graded_weight, Decimal::ZERO);
        assert_eq!(summary.remaining_weight, Decimal::ZERO);
        assert_eq!(summary.required_average, None);
    }
}
