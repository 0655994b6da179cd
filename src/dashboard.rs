//! # Dashboard Widgets
//!
//! Analytics data rendered on the agency dashboard: the sales performance
//! line chart, the conversion funnel and the annual sales card. Values are
//! static sample figures.

use serde::Serialize;
use utoipa::ToSchema;

const SALES_CATEGORIES: [&str; 2] = ["SemiAnalysis", "The Pragmatic Engineer"];
const SALES_COLORS: [&str; 2] = ["indigo", "rose"];

const MONTHLY_SALES: [(&str, [i64; 2]); 12] = [
    ("Jan 22", [2890, 2338]),
    ("Feb 22", [2756, 2103]),
    ("Mar 22", [3322, 2194]),
    ("Apr 22", [3470, 2108]),
    ("May 22", [3475, 1812]),
    ("Jun 22", [3129, 1726]),
    ("Jul 22", [3490, 1982]),
    ("Aug 22", [2903, 2012]),
    ("Sep 22", [2643, 2342]),
    ("Oct 22", [2837, 2473]),
    ("Nov 22", [2954, 3848]),
    ("Dec 22", [3239, 3736]),
];

const FUNNEL_STEPS: [(&str, u32); 3] = [
    ("1. Add credit Card", 89),
    ("2. Copy invite code", 6),
    ("3. Send invite code", 5),
];

const SALES_TOTAL: i64 = 71_465;
const SALES_TARGET: i64 = 225_000;
const SALES_PROGRESS_PERCENT: u8 = 32;

/// Format a whole-dollar amount as `$` plus US digit grouping, e.g. `$2,890`.
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// One category's value at a chart point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeriesValue {
    pub category: String,
    pub value: i64,
    /// Value rendered with [`format_currency`]
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChartPoint {
    /// Month label, e.g. `Jan 22`
    pub date: String,
    pub values: Vec<SeriesValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LineChartWidget {
    pub title: String,
    pub index: String,
    pub categories: Vec<String>,
    pub colors: Vec<String>,
    pub data: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FunnelStep {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionWidget {
    pub title: String,
    pub overall_conversion: String,
    pub description: String,
    pub funnel: Vec<FunnelStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesCardWidget {
    pub title: String,
    pub total: String,
    pub target_label: String,
    pub target: String,
    /// Progress toward the annual target, 0..=100
    pub progress: u8,
}

/// All widgets shown on the agency dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgets {
    pub sales_performance: LineChartWidget,
    pub conversion: ConversionWidget,
    pub sales: SalesCardWidget,
}

pub fn sales_performance_chart() -> LineChartWidget {
    let data = MONTHLY_SALES
        .iter()
        .map(|(date, values)| ChartPoint {
            date: date.to_string(),
            values: SALES_CATEGORIES
                .iter()
                .zip(values)
                .map(|(category, value)| SeriesValue {
                    category: category.to_string(),
                    value: *value,
                    formatted: format_currency(*value),
                })
                .collect(),
        })
        .collect();

    LineChartWidget {
        title: "Sales Performance".to_string(),
        index: "date".to_string(),
        categories: SALES_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        colors: SALES_COLORS.iter().map(|c| c.to_string()).collect(),
        data,
    }
}

pub fn conversion_widget() -> ConversionWidget {
    ConversionWidget {
        title: "Sales Performance".to_string(),
        overall_conversion: "5.6%".to_string(),
        description: "Uniques in specific order, who converted within 30 days.".to_string(),
        funnel: FUNNEL_STEPS
            .iter()
            .map(|(name, value)| FunnelStep {
                name: name.to_string(),
                value: *value,
            })
            .collect(),
    }
}

pub fn sales_card() -> SalesCardWidget {
    SalesCardWidget {
        title: "Sales".to_string(),
        total: format_currency(SALES_TOTAL),
        target_label: format!("{SALES_PROGRESS_PERCENT}% of annual target"),
        target: format_currency(SALES_TARGET),
        progress: SALES_PROGRESS_PERCENT,
    }
}

pub fn dashboard_widgets() -> DashboardWidgets {
    DashboardWidgets {
        sales_performance: sales_performance_chart(),
        conversion: conversion_widget(),
        sales: sales_card(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_us_grouping() {
        assert_eq!(format_currency(0), "$0");
        assert_eq!(format_currency(999), "$999");
        assert_eq!(format_currency(2890), "$2,890");
        assert_eq!(format_currency(71_465), "$71,465");
        assert_eq!(format_currency(225_000), "$225,000");
        assert_eq!(format_currency(1_234_567), "$1,234,567");
        assert_eq!(format_currency(-4200), "-$4,200");
    }

    #[test]
    fn chart_covers_twelve_months_for_both_categories() {
        let chart = sales_performance_chart();

        assert_eq!(chart.data.len(), 12);
        assert_eq!(chart.data[0].date, "Jan 22");
        assert_eq!(chart.data[11].date, "Dec 22");
        assert_eq!(chart.colors, vec!["indigo", "rose"]);
        assert!(chart.data.iter().all(|point| point.values.len() == 2));

        let november = &chart.data[10];
        assert_eq!(november.values[1].category, "The Pragmatic Engineer");
        assert_eq!(november.values[1].value, 3848);
        assert_eq!(november.values[1].formatted, "$3,848");
    }

    #[test]
    fn conversion_funnel_matches_dashboard() {
        let widget = conversion_widget();
        assert_eq!(widget.overall_conversion, "5.6%");
        let values: Vec<u32> = widget.funnel.iter().map(|step| step.value).collect();
        assert_eq!(values, vec![89, 6, 5]);
    }

    #[test]
    fn sales_card_figures() {
        let card = sales_card();
        assert_eq!(card.total, "$71,465");
        assert_eq!(card.target_label, "32% of annual target");
        assert_eq!(card.target, "$225,000");
        assert_eq!(card.progress, 32);
    }
}
