// src/services/report_service.rs

use std::path::PathBuf;

use chrono::NaiveDate;
use genpdf::{elements, style, Alignment, Element};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{dates, error::AppError, format},
    models::{
        finance::{Payable, PaymentStatus, Receivable, TitleFilter},
        residents::Resident,
        settings::InstitutionSettings,
        staff::{Employee, EmployeeStatus},
    },
    services::{
        finance_service::{monthly_fee_amount, FinanceService},
        resident_service::ResidentService,
        settings_service::SettingsService,
        staff_service::StaffService,
    },
};

pub fn employee_status_label(status: EmployeeStatus) -> &'static str {
    match status {
        EmployeeStatus::Active => "Ativo",
        EmployeeStatus::OnLeave => "Afastado",
        EmployeeStatus::Vacation => "Férias",
        EmployeeStatus::Terminated => "Desligado",
    }
}

pub fn payment_status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Em aberto",
        PaymentStatus::Paid => "Pago",
        PaymentStatus::Cancelled => "Cancelado",
        PaymentStatus::Overdue => "Vencido",
    }
}

/// Nome, CPF, cargo, setor, admissão, situação.
pub fn employee_rows(employees: &[Employee], departments: &[(Uuid, String)]) -> Vec<Vec<String>> {
    employees
        .iter()
        .map(|e| {
            let department = e
                .department_id
                .and_then(|id| departments.iter().find(|(dep_id, _)| *dep_id == id))
                .map(|(_, name)| name.clone())
                .unwrap_or_else(|| "-".to_string());
            vec![
                e.full_name.clone(),
                e.cpf.clone(),
                e.position.clone(),
                department,
                format::format_date_br(e.hire_date),
                employee_status_label(e.status).to_string(),
            ]
        })
        .collect()
}

/// Nome, CPF, idade, admissão, mensalidade.
pub fn resident_rows(residents: &[Resident], today: NaiveDate) -> Vec<Vec<String>> {
    residents
        .iter()
        .map(|r| {
            let fee = monthly_fee_amount(r.benefit_amount, r.contribution_percentage)
                .map(format::format_brl)
                .unwrap_or_else(|| "-".to_string());
            vec![
                r.full_name.clone(),
                r.cpf.clone(),
                dates::age_on(r.birth_date, today).to_string(),
                format::format_date_br(r.admission_date),
                fee,
            ]
        })
        .collect()
}

/// Vencimento, descrição, situação, valor.
pub fn title_row(due_date: NaiveDate, description: &str, status: PaymentStatus, amount: Decimal) -> Vec<String> {
    vec![
        format::format_date_br(due_date),
        description.to_string(),
        payment_status_label(status).to_string(),
        format::format_brl(amount),
    ]
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FinanceTotals {
    pub receivables: Decimal,
    pub received: Decimal,
    pub payables: Decimal,
    pub paid: Decimal,
}

impl FinanceTotals {
    /// Cancelados ficam de fora.
    pub fn from_titles(receivables: &[Receivable], payables: &[Payable]) -> Self {
        let mut totals = Self::default();
        for r in receivables.iter().filter(|r| r.status != PaymentStatus::Cancelled) {
            totals.receivables += r.amount;
            if r.status == PaymentStatus::Paid {
                totals.received += r.amount;
            }
        }
        for p in payables.iter().filter(|p| p.status != PaymentStatus::Cancelled) {
            totals.payables += p.amount;
            if p.status == PaymentStatus::Paid {
                totals.paid += p.amount;
            }
        }
        totals
    }

    /// Previsto: tudo a receber menos tudo a pagar.
    pub fn balance(&self) -> Decimal {
        self.receivables - self.payables
    }

    /// Realizado: recebido menos pago.
    pub fn settled_balance(&self) -> Decimal {
        self.received - self.paid
    }
}

/// QR Code com a chave Pix, pronto para o PDF.
pub fn pix_qr_image(pix_key: &str) -> Result<image::DynamicImage, AppError> {
    let code = QrCode::new(pix_key.trim().as_bytes())
        .map_err(|e| AppError::ReportError(format!("QR Code inválido: {}", e)))?;
    let buffer = code.render::<Luma<u8>>().build();
    Ok(image::DynamicImage::ImageLuma8(buffer))
}

#[derive(Clone)]
pub struct ReportService {
    staff: StaffService,
    residents: ResidentService,
    finance: FinanceService,
    settings: SettingsService,
    fonts_dir: PathBuf,
    font_family: String,
}

impl ReportService {
    pub fn new(
        staff: StaffService,
        residents: ResidentService,
        finance: FinanceService,
        settings: SettingsService,
        fonts_dir: impl Into<PathBuf>,
        font_family: impl Into<String>,
    ) -> Self {
        Self {
            staff,
            residents,
            finance,
            settings,
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
        }
    }

    pub async fn employees_report(&self, today: NaiveDate) -> Result<Vec<u8>, AppError> {
        let employees = self.staff.list_current_employees().await?;
        let departments = self.staff.department_names().await?;
        let settings = self.settings.get().await?;

        let mut doc = self.new_document("Relatório de Funcionários", &settings, today)?;
        push_table(
            &mut doc,
            vec![4, 3, 3, 3, 2, 2],
            &["Nome", "CPF", "Cargo", "Setor", "Admissão", "Situação"],
            employee_rows(&employees, &departments),
        )?;
        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new(format!("Total de funcionários: {}", employees.len())));

        render(doc)
    }

    pub async fn residents_report(&self, today: NaiveDate) -> Result<Vec<u8>, AppError> {
        let residents = self.residents.list_active().await?;
        let settings = self.settings.get().await?;

        let total_fees: Decimal = residents
            .iter()
            .filter_map(|r| monthly_fee_amount(r.benefit_amount, r.contribution_percentage))
            .sum();

        let mut doc = self.new_document("Relatório de Idosos", &settings, today)?;
        push_table(
            &mut doc,
            vec![5, 3, 1, 2, 2],
            &["Nome", "CPF", "Idade", "Admissão", "Mensalidade"],
            resident_rows(&residents, today),
        )?;
        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new(format!("Total de idosos: {}", residents.len())));
        doc.push(
            elements::Paragraph::new(format!("Mensalidades previstas: {}", format::format_brl(total_fees)))
                .styled(style::Style::new().bold()),
        );

        render(doc)
    }

    pub async fn finance_report(&self, from: NaiveDate, to: NaiveDate, today: NaiveDate) -> Result<Vec<u8>, AppError> {
        if to < from {
            return Err(AppError::InvalidInput(
                "A data final deve ser igual ou posterior à inicial.".to_string(),
            ));
        }

        let filter = TitleFilter { from: Some(from), to: Some(to), ..Default::default() };
        let receivables = self.finance.list_receivables(&filter).await?;
        let payables = self.finance.list_payables(&filter).await?;
        let settings = self.settings.get().await?;
        let totals = FinanceTotals::from_titles(&receivables, &payables);

        let mut doc = self.new_document("Relatório Financeiro", &settings, today)?;
        doc.push(elements::Paragraph::new(format!(
            "Período: {} a {}",
            format::format_date_br(from),
            format::format_date_br(to)
        )));
        doc.push(elements::Break::new(1));

        doc.push(section_title("Contas a receber"));
        push_table(
            &mut doc,
            vec![2, 6, 2, 2],
            &["Vencimento", "Descrição", "Situação", "Valor"],
            receivables
                .iter()
                .map(|r| title_row(r.due_date, &r.description, r.status, r.amount))
                .collect(),
        )?;
        doc.push(elements::Break::new(1));

        doc.push(section_title("Contas a pagar"));
        push_table(
            &mut doc,
            vec![2, 6, 2, 2],
            &["Vencimento", "Descrição", "Situação", "Valor"],
            payables
                .iter()
                .map(|p| title_row(p.due_date, &p.description, p.status, p.amount))
                .collect(),
        )?;
        doc.push(elements::Break::new(1.5));

        for line in [
            format!("Total a receber: {}", format::format_brl(totals.receivables)),
            format!("Recebido: {}", format::format_brl(totals.received)),
            format!("Total a pagar: {}", format::format_brl(totals.payables)),
            format!("Pago: {}", format::format_brl(totals.paid)),
            format!("Saldo realizado: {}", format::format_brl(totals.settled_balance())),
        ] {
            doc.push(elements::Paragraph::new(line).aligned(Alignment::Right));
        }
        doc.push(
            elements::Paragraph::new(format!("SALDO PREVISTO: {}", format::format_brl(totals.balance())))
                .aligned(Alignment::Right)
                .styled(style::Style::new().bold().with_font_size(12)),
        );

        render(doc)
    }

    pub async fn receivable_receipt(&self, id: Uuid, today: NaiveDate) -> Result<Vec<u8>, AppError> {
        let receivable = self.finance.get_receivable(id).await?;
        let settings = self.settings.get().await?;
        let resident = match receivable.resident_id {
            Some(resident_id) => Some(self.residents.get(resident_id).await?),
            None => None,
        };

        let title = if receivable.status == PaymentStatus::Paid { "Recibo" } else { "Cobrança" };
        let mut doc = self.new_document(title, &settings, today)?;

        doc.push(elements::Paragraph::new(receivable.description.clone()).styled(style::Style::new().bold()));
        if let Some(resident) = &resident {
            doc.push(elements::Paragraph::new(format!("Idoso(a): {} (CPF {})", resident.full_name, resident.cpf)));
        }
        doc.push(elements::Paragraph::new(format!("Vencimento: {}", format::format_date_br(receivable.due_date))));
        doc.push(elements::Paragraph::new(format!(
            "Situação: {}",
            payment_status_label(receivable.status)
        )));
        if let Some(settled_at) = receivable.settled_at {
            doc.push(elements::Paragraph::new(format!("Recebido em: {}", format::format_date_br(settled_at))));
        }
        if let Some(method) = &receivable.payment_method {
            doc.push(elements::Paragraph::new(format!("Forma de pagamento: {}", method)));
        }
        doc.push(elements::Break::new(1));
        doc.push(
            elements::Paragraph::new(format!("VALOR: {}", format::format_brl(receivable.amount)))
                .aligned(Alignment::Right)
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        if let Some(key) = settings.pix_key.as_deref().filter(|k| !k.trim().is_empty()) {
            doc.push(elements::Break::new(2));
            doc.push(section_title("PAGAMENTO VIA PIX"));
            doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
            doc.push(elements::Break::new(1));

            let qr = elements::Image::from_dynamic_image(pix_qr_image(key)?)
                .map_err(|e| AppError::ReportError(e.to_string()))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));
            doc.push(qr);
        }

        render(doc)
    }

    fn new_document(
        &self,
        title: &str,
        settings: &InstitutionSettings,
        today: NaiveDate,
    ) -> Result<genpdf::Document, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None).map_err(|e| {
            AppError::ReportError(format!(
                "fonte {} não encontrada em {}: {}",
                self.font_family,
                self.fonts_dir.display(),
                e
            ))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(title);
        doc.set_font_size(10);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        let institution = settings.name.clone().unwrap_or_else(|| "Crevin".to_string());
        doc.push(elements::Paragraph::new(institution).styled(style::Style::new().bold().with_font_size(16)));
        if let Some(document_number) = &settings.document_number {
            doc.push(
                elements::Paragraph::new(format!("CNPJ: {}", document_number))
                    .styled(style::Style::new().with_font_size(9)),
            );
        }
        if let Some(address) = &settings.address {
            doc.push(elements::Paragraph::new(address.clone()).styled(style::Style::new().with_font_size(9)));
        }
        doc.push(elements::Break::new(1.5));
        doc.push(
            elements::Paragraph::new(title.to_uppercase()).styled(style::Style::new().bold().with_font_size(13)),
        );
        doc.push(
            elements::Paragraph::new(format!("Emitido em {}", format::format_date_br(today)))
                .styled(style::Style::new().italic().with_font_size(8)),
        );
        doc.push(elements::Break::new(1));

        Ok(doc)
    }
}

fn section_title(text: &str) -> elements::StyledElement<elements::Paragraph> {
    elements::Paragraph::new(text.to_string()).styled(style::Style::new().bold().with_font_size(11))
}

fn push_table(
    doc: &mut genpdf::Document,
    weights: Vec<usize>,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> Result<(), AppError> {
    let mut table = elements::TableLayout::new(weights);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold();
    let mut header = table.row();
    for h in headers {
        header.push_element(elements::Paragraph::new(h.to_string()).styled(bold));
    }
    header.push().map_err(|e| AppError::ReportError(e.to_string()))?;

    if rows.is_empty() {
        let mut empty = table.row();
        for (i, _) in headers.iter().enumerate() {
            let text = if i == 0 { "Nenhum registro" } else { "" };
            empty.push_element(elements::Paragraph::new(text));
        }
        empty.push().map_err(|e| AppError::ReportError(e.to_string()))?;
    }

    for cells in rows {
        let mut row = table.row();
        for cell in cells {
            row.push_element(elements::Paragraph::new(cell));
        }
        row.push().map_err(|e| AppError::ReportError(e.to_string()))?;
    }

    doc.push(table);
    Ok(())
}

fn render(doc: genpdf::Document) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(|e| AppError::ReportError(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn money(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(name: &str, department_id: Option<Uuid>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            cpf: "529.982.247-25".to_string(),
            rg: None,
            birth_date: d(1985, 4, 2),
            phone: None,
            email: None,
            address: None,
            zip_code: None,
            position: "Cuidadora".to_string(),
            department_id,
            hire_date: d(2020, 1, 6),
            termination_date: None,
            salary: None,
            status: EmployeeStatus::Vacation,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn resident(benefit: Option<&str>, pct: Option<&str>) -> Resident {
        Resident {
            id: Uuid::new_v4(),
            full_name: "Maria das Dores".to_string(),
            cpf: "111.444.777-35".to_string(),
            rg: None,
            birth_date: d(1940, 6, 15),
            phone: None,
            address: None,
            emergency_contact: None,
            emergency_phone: None,
            medical_notes: None,
            benefit_type: Some("BPC".to_string()),
            benefit_amount: benefit.map(money),
            contribution_percentage: pct.map(money),
            admission_date: d(2022, 3, 1),
            discharge_date: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn receivable(amount: &str, status: PaymentStatus) -> Receivable {
        Receivable {
            id: Uuid::new_v4(),
            description: "Mensalidade".to_string(),
            amount: money(amount),
            due_date: d(2025, 3, 10),
            status,
            category_id: None,
            resident_id: None,
            bank_account_id: None,
            payment_method: None,
            settled_at: None,
            reference_month: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payable(amount: &str, status: PaymentStatus) -> Payable {
        Payable {
            id: Uuid::new_v4(),
            description: "Energia".to_string(),
            amount: money(amount),
            due_date: d(2025, 3, 15),
            status,
            category_id: None,
            supplier_id: None,
            bank_account_id: None,
            payment_method: None,
            settled_at: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn employee_rows_resolve_department_names() {
        let dep = Uuid::new_v4();
        let departments = vec![(dep, "Enfermagem".to_string())];
        let rows = employee_rows(&[employee("Ana", Some(dep)), employee("Bia", None)], &departments);

        assert_eq!(rows[0], vec!["Ana", "529.982.247-25", "Cuidadora", "Enfermagem", "06/01/2020", "Férias"]);
        assert_eq!(rows[1][3], "-");
    }

    #[test]
    fn resident_rows_show_age_and_fee() {
        let rows = resident_rows(
            &[resident(Some("1412.00"), Some("70")), resident(None, Some("70"))],
            d(2025, 6, 14),
        );
        assert_eq!(rows[0][2], "84");
        assert_eq!(rows[0][4], "R$ 988,40");
        assert_eq!(rows[1][4], "-");
    }

    #[test]
    fn title_row_formats_values() {
        let row = title_row(d(2025, 3, 10), "Aluguel", PaymentStatus::Overdue, money("1234.5"));
        assert_eq!(row, vec!["10/03/2025", "Aluguel", "Vencido", "R$ 1.234,50"]);
    }

    #[test]
    fn totals_ignore_cancelled_titles() {
        let receivables = vec![
            receivable("1000.00", PaymentStatus::Paid),
            receivable("500.00", PaymentStatus::Overdue),
            receivable("999.99", PaymentStatus::Cancelled),
        ];
        let payables = vec![
            payable("300.00", PaymentStatus::Paid),
            payable("450.50", PaymentStatus::Pending),
        ];

        let totals = FinanceTotals::from_titles(&receivables, &payables);
        assert_eq!(totals.receivables, money("1500.00"));
        assert_eq!(totals.received, money("1000.00"));
        assert_eq!(totals.payables, money("750.50"));
        assert_eq!(totals.paid, money("300.00"));
        assert_eq!(totals.balance(), money("749.50"));
        assert_eq!(totals.settled_balance(), money("700.00"));
    }

    #[test]
    fn empty_period_has_zero_totals() {
        let totals = FinanceTotals::from_titles(&[], &[]);
        assert_eq!(totals, FinanceTotals::default());
        assert_eq!(totals.balance(), Decimal::ZERO);
    }

    #[test]
    fn pix_qr_code_is_square() {
        let image = pix_qr_image("11.222.333/0001-81").unwrap();
        let luma = image.to_luma8();
        assert!(luma.width() > 0);
        assert_eq!(luma.width(), luma.height());
    }
}
