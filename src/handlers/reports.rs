use axum::{extract::State, response::Response};
use chrono::{Local, NaiveDate};

use super::{attachment, SharedDesk};
use crate::{
    errors::AppError,
    models::{KpiData, Product},
};

const BOM: char = '\u{FEFF}';

/// Executive summary followed by the monthly KPI table.
pub fn dashboard_csv(total_products: usize, kpi: &[KpiData], generated_on: NaiveDate) -> String {
    let mut lines = vec![
        format!("{}المقياس,القيمة", BOM),
        format!("تقرير ملخص النظام,{}", generated_on.format("%Y-%m-%d")),
        format!("إجمالي المنتجات,{}", total_products),
        format!("إجمالي تقارير الأداء,{}", kpi.len()),
        String::new(),
        "تحليل مؤشرات الأداء".to_string(),
        "الشهر,معدل الجودة (%),عدد العيوب".to_string(),
    ];
    lines.extend(
        kpi.iter()
            .map(|entry| format!("{},{},{}", entry.month, entry.quality_rate, entry.defects)),
    );
    lines.join("\n")
}

pub async fn dashboard_report(State(desk): State<SharedDesk>) -> Result<Response, AppError> {
    let desk = desk.lock().await;
    desk.gate.require_session()?;

    let today = Local::now().date_naive();
    let csv = dashboard_csv(
        desk.store.list::<Product>().len(),
        desk.store.kpi_entries(),
        today,
    );
    let filename = format!("TQM_Dashboard_Report_{}.csv", today.format("%Y-%m-%d"));
    Ok(attachment(&filename, "text/csv; charset=utf-8", csv.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn kpi(month: &str, quality_rate: f64, defects: f64) -> KpiData {
        KpiData {
            month: month.to_string(),
            year: "2024".to_string(),
            quality_rate,
            defects,
            ..Default::default()
        }
    }

    #[test]
    fn kpi_rows_follow_summary_in_insertion_order() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let csv = dashboard_csv(4, &[kpi("يناير", 95.0, 3.0), kpi("فبراير", 97.0, 1.0)], date);

        assert!(csv.starts_with('\u{FEFF}'));
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[1], "تقرير ملخص النظام,2024-03-01");
        assert_eq!(lines[2], "إجمالي المنتجات,4");
        assert_eq!(lines[3], "إجمالي تقارير الأداء,2");
        assert_eq!(lines[4], "");

        let january = lines.iter().position(|l| *l == "يناير,95,3").unwrap();
        let february = lines.iter().position(|l| *l == "فبراير,97,1").unwrap();
        let summary = lines.iter().position(|l| l.starts_with("إجمالي المنتجات")).unwrap();
        assert!(summary < january && january < february);
    }

    #[test]
    fn fractional_rates_keep_their_decimals() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let csv = dashboard_csv(0, &[kpi("مارس", 98.5, 0.0)], date);
        assert!(csv.ends_with("مارس,98.5,0"));
    }

    #[tokio::test]
    async fn report_is_downloadable_for_any_role() {
        let (desk, _) = desk().await;
        let app = app(&desk);
        login(&app, ADMIN).await;
        send_json(
            &app,
            Method::POST,
            "/api/kpi",
            Some(json!({"month": "يناير", "year": "2024", "qualityRate": 95, "defects": 3})),
        )
        .await;
        login(&app, USER).await;

        let (status, bytes) = send(&app, Method::GET, "/api/reports/dashboard.csv", None).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\nيناير,95,3"));
    }
}
