// src/models/reports.rs

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FinanceReportQuery {
    /// Início do período (padrão: primeiro dia do mês atual)
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    /// Fim do período (padrão: último dia do mês atual)
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}
