//! Business operations
//!
//! Each operation builds its request with the argument checks from
//! [`zfprint_core::Request`], runs one exchange, and decodes the response
//! into a typed record where there is one.

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use zfprint_core::constants::logo;
use zfprint_core::frame::logo_frame;
use zfprint_core::request::MAX_DISPLAY_DATA;
use zfprint_core::{Align, Command, Discount, InvoiceDetails, ReportMode, Request, TaxGroup};
use zfprint_types::{
    datetime, scalar, Article, DeviceInfo, DeviceParameters, DeviceStatus, OperatorInfo,
    PaymentTypes, ReceiptInfo, TaxTable,
};

use crate::error::{Error, Result};
use crate::printer::Printer;

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })
}

impl Printer {
    // Device information

    /// Get device status flags
    pub async fn status(&mut self) -> Result<DeviceStatus> {
        let payload = self.query(Request::bare(Command::GetStatus)).await?;
        Ok(DeviceStatus::decode(&payload)?)
    }

    /// Get firmware version
    pub async fn version(&mut self) -> Result<String> {
        let payload = self.query(Request::bare(Command::GetVersion)).await?;
        Ok(scalar::version(&payload))
    }

    /// Print the diagnostic receipt
    pub async fn diagnostic(&mut self) -> Result<()> {
        self.command(Request::bare(Command::Diagnostic)).await
    }

    /// Get factory and fiscal memory numbers together with the firmware version
    pub async fn device_info(&mut self) -> Result<DeviceInfo> {
        let payload = self.query(Request::bare(Command::GetSerialNumbers)).await?;
        let info = DeviceInfo::decode(&payload)?;
        let version = self.version().await?;

        debug!("Device info: {}", info);
        Ok(info.with_firmware_version(version))
    }

    // External display

    pub async fn display_clear(&mut self) -> Result<()> {
        self.command(Request::bare(Command::DisplayClear)).await
    }

    /// Show text on the upper display line
    pub async fn display_line1(&mut self, text: &str) -> Result<()> {
        self.command(Request::display_line1(text)).await
    }

    /// Show text on the lower display line
    pub async fn display_line2(&mut self, text: &str) -> Result<()> {
        self.command(Request::display_line2(text)).await
    }

    /// Show text across both display lines
    pub async fn display(&mut self, text: &str) -> Result<()> {
        self.command(Request::display(text)).await
    }

    pub async fn display_date_time(&mut self) -> Result<()> {
        self.command(Request::bare(Command::DisplayDateTime)).await
    }

    // Paper and drawer

    pub async fn paper_cut(&mut self) -> Result<()> {
        self.command(Request::bare(Command::PaperCut)).await
    }

    pub async fn open_till(&mut self) -> Result<()> {
        self.command(Request::bare(Command::OpenTill)).await
    }

    pub async fn line_feed(&mut self) -> Result<()> {
        self.command(Request::bare(Command::LineFeed)).await
    }

    /// Print the stored logo
    pub async fn print_logo(&mut self) -> Result<()> {
        self.command(Request::bare(Command::PrintLogo)).await
    }

    // Receipts

    pub async fn open_non_fiscal_receipt(&mut self, operator: u8, password: &str) -> Result<()> {
        self.command(Request::open_non_fiscal_receipt(operator, password)?)
            .await
    }

    pub async fn close_non_fiscal_receipt(&mut self) -> Result<()> {
        self.command(Request::bare(Command::CloseNonFiscalReceipt))
            .await
    }

    /// Open a fiscal receipt
    ///
    /// `detailed` prints every line in full, `vat` adds the VAT breakdown.
    pub async fn open_fiscal_receipt(
        &mut self,
        operator: u8,
        password: &str,
        detailed: bool,
        vat: bool,
    ) -> Result<()> {
        self.command(Request::open_fiscal_receipt(operator, password, detailed, vat)?)
            .await
    }

    /// Open an invoice; it is closed like a fiscal receipt
    pub async fn open_invoice(
        &mut self,
        operator: u8,
        password: &str,
        invoice: &InvoiceDetails<'_>,
    ) -> Result<()> {
        self.command(Request::open_invoice(operator, password, invoice)?)
            .await
    }

    /// Sell an item given by name
    ///
    /// `discount` is a signed percentage; zero leaves it out.
    pub async fn sell_free(
        &mut self,
        name: &str,
        group: TaxGroup,
        price: f64,
        quantity: f64,
        discount: f64,
    ) -> Result<()> {
        self.command(Request::sell_free(name, group, price, quantity, discount)?)
            .await
    }

    /// Sell an article programmed in the device
    pub async fn sell_from_database(&mut self, number: u32, quantity: f64, discount: f64) -> Result<()> {
        self.command(Request::sell_from_database(false, number, quantity, discount)?)
            .await
    }

    /// Void a sale of a programmed article
    pub async fn void_from_database(&mut self, number: u32, quantity: f64, discount: f64) -> Result<()> {
        self.command(Request::sell_from_database(true, number, quantity, discount)?)
            .await
    }

    /// Intermediate sum of the open receipt
    pub async fn subtotal(
        &mut self,
        print: bool,
        display: bool,
        discount: Option<Discount>,
    ) -> Result<f64> {
        let payload = self
            .query(Request::subtotal(print, display, discount)?)
            .await?;
        Ok(scalar::amount(&payload)?)
    }

    /// Pay with payment type `kind` (0..=4)
    pub async fn payment(&mut self, kind: u8, sum: f64, no_change: bool) -> Result<()> {
        self.command(Request::payment(kind, sum, no_change)?).await
    }

    pub async fn pay_vat(&mut self) -> Result<()> {
        self.command(Request::bare(Command::PayVat)).await
    }

    /// Print one line of free text
    pub async fn print_text(&mut self, text: &str, align: Align) -> Result<()> {
        self.command(Request::print_text(text, align)).await
    }

    pub async fn close_fiscal_receipt(&mut self) -> Result<()> {
        self.command(Request::bare(Command::CloseFiscalReceipt)).await
    }

    pub async fn close_invoice(&mut self) -> Result<()> {
        self.close_fiscal_receipt().await
    }

    pub async fn print_duplicate(&mut self) -> Result<()> {
        self.command(Request::bare(Command::PrintDuplicate)).await
    }

    /// Register a paid-out (negative) or received-on-account sum
    pub async fn official_sums(
        &mut self,
        operator: u8,
        password: &str,
        kind: u8,
        sum: f64,
    ) -> Result<()> {
        self.command(Request::official_sums(operator, password, kind, sum)?)
            .await
    }

    // Queries

    pub async fn tax_number(&mut self) -> Result<String> {
        let payload = self.query(Request::bare(Command::GetTaxNumber)).await?;
        Ok(scalar::tax_number(&payload)?)
    }

    pub async fn tax_percents(&mut self) -> Result<TaxTable> {
        let payload = self.query(Request::bare(Command::GetTaxPercents)).await?;
        Ok(TaxTable::decode_percents(&payload)?)
    }

    pub async fn decimal_point(&mut self) -> Result<u8> {
        let payload = self.query(Request::bare(Command::GetDecimalPoint)).await?;
        Ok(scalar::decimal_point(&payload)?)
    }

    pub async fn last_receipt_number(&mut self) -> Result<u32> {
        let payload = self.query(Request::bare(Command::GetReceiptNumber)).await?;
        Ok(scalar::counter(&payload)?)
    }

    pub async fn payment_types(&mut self) -> Result<PaymentTypes> {
        let payload = self.query(Request::bare(Command::GetPayTypes)).await?;
        Ok(PaymentTypes::decode(&payload)?)
    }

    pub async fn parameters(&mut self) -> Result<DeviceParameters> {
        let payload = self.query(Request::bare(Command::GetParameters)).await?;
        Ok(DeviceParameters::decode(&payload)?)
    }

    /// Device clock
    pub async fn date_time(&mut self) -> Result<NaiveDateTime> {
        let payload = self.query(Request::bare(Command::GetDateTime)).await?;
        Ok(datetime::decode(&payload)?)
    }

    /// Header/footer line 1..=8
    pub async fn header_line(&mut self, line: u8) -> Result<String> {
        let payload = self.query(Request::get_header_line(line)?).await?;
        Ok(scalar::header_line(&payload)?)
    }

    pub async fn operator_info(&mut self, operator: u8) -> Result<OperatorInfo> {
        let payload = self.query(Request::get_operator_info(operator)?).await?;
        Ok(OperatorInfo::decode(&payload)?)
    }

    /// Article 0..=1000 from the device database
    pub async fn article(&mut self, number: u32) -> Result<Article> {
        let payload = self.query(Request::get_article_info(number)?).await?;
        Ok(Article::decode(number, &payload)?)
    }

    /// Turnover per tax group since the last Z report
    pub async fn daily_sums(&mut self) -> Result<TaxTable> {
        let payload = self.query(Request::bare(Command::GetDailySums)).await?;
        Ok(TaxTable::decode_sums(&payload)?)
    }

    /// State of the receipt currently open
    pub async fn receipt_info(&mut self) -> Result<ReceiptInfo> {
        let payload = self.query(Request::bare(Command::GetReceiptInfo)).await?;
        Ok(ReceiptInfo::decode(&payload)?)
    }

    /// Free fiscal memory blocks
    pub async fn free_fiscal_space(&mut self) -> Result<u32> {
        let payload = self
            .query(Request::bare(Command::GetFreeFiscalSpace))
            .await?;
        Ok(scalar::counter(&payload)?)
    }

    // Setup

    /// Rename payment type 1..=3
    pub async fn set_payment_type(&mut self, kind: u8, name: &str) -> Result<()> {
        self.command(Request::set_pay_type(kind, name)?).await
    }

    pub async fn set_parameters(&mut self, parameters: &DeviceParameters) -> Result<()> {
        self.command(Request::set_parameters(
            parameters.pos_number,
            parameters.print_logo,
            parameters.open_till,
            parameters.auto_cut,
            parameters.transparent_display,
        )?)
        .await
    }

    pub async fn set_date_time(&mut self, at: NaiveDateTime) -> Result<()> {
        info!("Setting device clock to {}", at);
        self.command(Request::set_date_time(at)).await
    }

    /// Set the device clock from the host clock
    pub async fn set_local_date_time(&mut self) -> Result<()> {
        self.set_date_time(Local::now().naive_local()).await
    }

    pub async fn set_header_line(&mut self, line: u8, text: &str) -> Result<()> {
        self.command(Request::set_header_line(line, text)?).await
    }

    /// Set name and password of operator 1..=9
    pub async fn set_operator(&mut self, operator: u8, name: &str, password: &str) -> Result<()> {
        self.command(Request::set_operator(operator, name, password)?)
            .await
    }

    pub async fn set_article(
        &mut self,
        number: u32,
        name: &str,
        price: f64,
        group: TaxGroup,
    ) -> Result<()> {
        self.command(Request::set_article(number, name, price, group)?)
            .await
    }

    /// Upload a logo bitmap
    ///
    /// The upload is a fixed raw block and the device sends nothing back,
    /// so a successful return only means the bytes were written.
    ///
    /// # Errors
    ///
    /// A bitmap of the wrong size fails with code 0x108 before anything is
    /// sent.
    pub async fn set_logo(&mut self, bitmap: &[u8]) -> Result<()> {
        let frame = logo_frame(bitmap)?;
        info!(bytes = frame.len(), "Uploading logo");
        self.send_unacknowledged(&frame).await
    }

    /// Upload a logo bitmap read from a file
    ///
    /// Only the first 3902 bytes are uploaded, so a file with trailing data
    /// is accepted. A shorter file fails with code 0x108.
    pub async fn set_logo_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut bitmap = read_file(path).await?;
        if bitmap.len() > logo::BITMAP_SIZE {
            debug!(
                path = %path.display(),
                size = bitmap.len(),
                "Using the leading bitmap of a larger logo file"
            );
            bitmap.truncate(logo::BITMAP_SIZE);
        }
        self.set_logo(&bitmap).await
    }

    // Reports

    pub async fn report_special_fiscal(&mut self) -> Result<()> {
        self.command(Request::bare(Command::ReportSpecialFiscal))
            .await
    }

    /// Fiscal memory report over a block range
    pub async fn report_fiscal_by_block(&mut self, detailed: bool, start: u32, end: u32) -> Result<()> {
        self.command(Request::report_fiscal_by_block(detailed, start, end)?)
            .await
    }

    /// Fiscal memory report over a date range
    pub async fn report_fiscal_by_date(
        &mut self,
        detailed: bool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<()> {
        self.command(Request::report_fiscal_by_date(detailed, start, end)?)
            .await
    }

    /// X (read) or Z (read and reset) daily report
    pub async fn report_daily(&mut self, mode: ReportMode, extended: bool) -> Result<()> {
        info!(mode = %mode.as_char(), extended, "Daily report");
        self.command(Request::report_daily(mode, extended)).await
    }

    /// Report for one operator, or all with 0
    pub async fn report_operator(&mut self, mode: ReportMode, operator: u8) -> Result<()> {
        self.command(Request::report_operator(mode, operator)?).await
    }

    pub async fn report_articles(&mut self, mode: ReportMode) -> Result<()> {
        self.command(Request::report_articles(mode)).await
    }

    // Service

    pub async fn set_serial_number(
        &mut self,
        password: &str,
        factory: &str,
        fiscal: &str,
        check: &str,
    ) -> Result<()> {
        self.command(Request::set_serial_number(password, factory, fiscal, check))
            .await
    }

    pub async fn set_tax_number(&mut self, password: &str, tax_number: &str, fiscal: &str) -> Result<()> {
        self.command(Request::set_tax_number(password, tax_number, fiscal))
            .await
    }

    /// Fiscalize the device; irreversible
    pub async fn make_fiscal(&mut self, password: &str) -> Result<()> {
        warn!("Fiscalizing device {}", self.endpoint());
        self.command(Request::make_fiscal(password)).await
    }

    pub async fn set_tax_percents(&mut self, password: &str, rates: [f64; 3]) -> Result<()> {
        self.command(Request::set_tax_percents(password, rates)?)
            .await
    }

    pub async fn set_decimal_point(&mut self, password: &str, point: u8) -> Result<()> {
        self.command(Request::set_decimal_point(password, point)?)
            .await
    }

    /// Program the external display
    pub async fn set_external_display(&mut self, password: &str, data: &[u8]) -> Result<()> {
        self.command(Request::set_external_display(password, data)?)
            .await
    }

    /// Program the external display from a file; at most 101 bytes are used
    pub async fn set_external_display_file(
        &mut self,
        password: &str,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let mut data = read_file(path.as_ref()).await?;
        data.truncate(MAX_DISPLAY_DATA);
        self.set_external_display(password, &data).await
    }
}
