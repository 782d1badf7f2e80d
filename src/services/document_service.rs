// src/services/document_service.rs

use genpdf::{elements, style, Element};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::{Executor, Postgres};

use crate::{
    common::{error::AppError, time::now_in_target, time::format_provenance},
    db::CrmRepository,
    models::{
        crm::{Customer, CustomerQuery},
        export::{ExportFile, ExportFormat, ExportRow, DEFAULT_INDUSTRY, NOT_AVAILABLE},
    },
    services::query_service::{QueryService, ALL},
};

const RUPEES_PER_CRORE: i64 = 10_000_000;

/// Rúpias → crores, sempre com duas casas. Aritmética decimal exata: empate
/// de meio paisa arredonda para longe do zero (10.050.000 → "1.01").
pub fn format_crore(rupees: i64) -> String {
    let crores = (Decimal::from(rupees) / Decimal::from(RUPEES_PER_CRORE))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", crores)
}

/// `Customers_Export_<zona>.<ext>`, com espaços da zona trocados por `_`.
pub fn export_filename(zone: &str, format: ExportFormat) -> String {
    format!("Customers_Export_{}.{}", zone.replace(' ', "_"), format.extension())
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() { default.to_string() } else { value.to_string() }
}

/// Uma linha por cliente, zona derivada por linha.
pub fn format_rows(query: &QueryService, customers: &[&Customer]) -> Vec<ExportRow> {
    customers
        .iter()
        .map(|c| ExportRow {
            name: c.name.clone(),
            city: c.city.clone(),
            state: c.state.clone(),
            zone: query.zone_of(c),
            industry: or_default(&c.industry, DEFAULT_INDUSTRY),
            turnover_cr: format_crore(c.annual_turnover),
            last_modified_by: or_default(&c.last_modified_by, NOT_AVAILABLE),
            updated_at: or_default(&c.updated_at, NOT_AVAILABLE),
        })
        .collect()
}

pub fn render_csv(rows: &[ExportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ExportRow::HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::ExportError(e.to_string()))
}

#[derive(Clone)]
pub struct DocumentService {
    repo: CrmRepository,
    query: QueryService,
    fonts_dir: String,
    font_family: String,
}

impl DocumentService {
    pub fn new(repo: CrmRepository, query: QueryService, fonts_dir: String, font_family: String) -> Self {
        Self { repo, query, fonts_dir, font_family }
    }

    /// Exporta exatamente o que a lista de clientes mostra com os mesmos filtros.
    pub async fn export_customers<'e, E>(
        &self,
        executor: E,
        filters: &CustomerQuery,
        format: ExportFormat,
    ) -> Result<ExportFile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customers = self.repo.list_customers(executor).await?;
        let selected = self.query.query_customers(&customers, filters);

        let zone = filters
            .zone
            .as_deref()
            .map(str::trim)
            .filter(|z| !z.is_empty())
            .unwrap_or(ALL);

        self.render_export(&selected, zone, format)
    }

    /// Formata os clientes já filtrados e renderiza tudo de uma vez: volta o
    /// arquivo inteiro ou um erro.
    pub fn render_export(
        &self,
        customers: &[&Customer],
        zone: &str,
        format: ExportFormat,
    ) -> Result<ExportFile, AppError> {
        let rows = format_rows(&self.query, customers);

        let bytes = match format {
            ExportFormat::Csv => render_csv(&rows)?,
            ExportFormat::Pdf => self.render_pdf(&rows, zone)?,
        };

        tracing::info!(rows = rows.len(), zone, format = format.extension(), "customer export rendered");

        Ok(ExportFile {
            filename: export_filename(zone, format),
            content_type: format.content_type(),
            bytes,
        })
    }

    fn render_pdf(&self, rows: &[ExportRow], zone: &str) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None)
            .map_err(|e| AppError::FontNotFound(format!("{}/{}: {}", self.fonts_dir, self.font_family, e)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Customers - {}", zone));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(format!("CUSTOMER EXPORT - {}", zone.to_uppercase()))
            .styled(style::Style::new().bold().with_font_size(14)));
        doc.push(elements::Paragraph::new(format!(
            "Generated: {} ({} customers)",
            format_provenance(&now_in_target()),
            rows.len()
        )).styled(style::Style::new().with_font_size(8)));
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        let mut table = elements::TableLayout::new(vec![4, 2, 2, 2, 2, 2, 2, 3]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let header_style = style::Style::new().bold().with_font_size(8);
        let mut header = table.row();
        for title in ExportRow::HEADERS {
            header = header.element(elements::Paragraph::new(title).styled(header_style));
        }
        header.push().map_err(|e| AppError::ExportError(e.to_string()))?;

        let cell_style = style::Style::new().with_font_size(7);
        for row in rows {
            let mut line = table.row();
            for cell in row.cells() {
                line = line.element(elements::Paragraph::new(cell).styled(cell_style));
            }
            line.push().map_err(|e| AppError::ExportError(e.to_string()))?;
        }

        doc.push(table);

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::ExportError(e.to_string()))?;

        Ok(buffer)
    }
}
