//! Command catalog: typed arguments to command byte and payload
//!
//! Every builder validates its arguments before producing anything, so an
//! out-of-range value never reaches the wire. Failures are
//! [`Error::InvalidInput`] or [`Error::NonFinite`], both reported as code
//! 0x101.

use std::fmt;

use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime};

use crate::command::Command;
use crate::constants::{Align, ReportMode};
use crate::encoding::{self, PayloadBuilder};
use crate::error::{Error, Result};

/// Width of a line on the printed receipt
pub const PRINT_WIDTH: usize = 34;

/// Width of one external display line
pub const DISPLAY_LINE_WIDTH: usize = 20;

/// Maximum external display programming data
pub const MAX_DISPLAY_DATA: usize = 101;

/// A command ready to be framed
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub payload: Bytes,
}

/// Tax group attached to a sold item
///
/// Digits, ASCII letters and uppercase Cyrillic letters are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaxGroup(char);

impl TaxGroup {
    pub fn new(group: char) -> Result<Self> {
        if group.is_ascii_alphanumeric() || ('А'..='Я').contains(&group) {
            Ok(Self(group))
        } else {
            Err(Error::invalid(format!("tax group {:?}", group)))
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl TryFrom<char> for TaxGroup {
    type Error = Error;

    fn try_from(group: char) -> Result<Self> {
        Self::new(group)
    }
}

impl fmt::Display for TaxGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discount or surcharge applied to a subtotal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discount {
    /// Signed percentage
    Percent(f64),
    /// Signed absolute amount
    Amount(f64),
}

/// Client details printed on an invoice
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceDetails<'a> {
    pub client: &'a str,
    pub receiver: &'a str,
    pub tax_number: &'a str,
    pub bulstat: &'a str,
    pub address: &'a str,
}

fn check_range<T>(what: &str, value: T, min: T, max: T) -> Result<T>
where
    T: PartialOrd + fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(Error::invalid(format!(
            "{} {} outside {}..={}",
            what, value, min, max
        )));
    }
    Ok(value)
}

fn check_amount(what: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::NonFinite(what));
    }
    check_range(what, value, min, max)
}

fn operator(op: u8) -> Result<u8> {
    check_range("operator", op, 1, 9)
}

fn password4(pass: &str) -> Vec<u8> {
    encoding::fixed(pass, 4, Align::Left)
}

fn password6(pass: &str) -> Vec<u8> {
    encoding::fixed(pass, 6, Align::Left)
}

/// `,sdd.dd%` suffix, omitted for a zero discount
fn discount_suffix(builder: PayloadBuilder, discount: f64) -> Result<PayloadBuilder> {
    if discount == 0.0 {
        return Ok(builder);
    }
    Ok(builder.push_char(',').push_str(&encoding::percent(discount)?))
}

impl Request {
    pub fn new(command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// Command without a payload
    pub fn bare(command: Command) -> Self {
        Self::new(command, Bytes::new())
    }

    // Display

    pub fn display_line1(text: &str) -> Self {
        Self::new(
            Command::DisplayLine1,
            encoding::fixed(text, DISPLAY_LINE_WIDTH, Align::Left),
        )
    }

    pub fn display_line2(text: &str) -> Self {
        Self::new(
            Command::DisplayLine2,
            encoding::fixed(text, DISPLAY_LINE_WIDTH, Align::Left),
        )
    }

    /// Both display lines, 40 characters
    pub fn display(text: &str) -> Self {
        Self::new(
            Command::Display,
            encoding::fixed(text, 2 * DISPLAY_LINE_WIDTH, Align::Left),
        )
    }

    // Receipts

    pub fn open_non_fiscal_receipt(op: u8, password: &str) -> Result<Self> {
        let payload = PayloadBuilder::new()
            .push_str(&operator(op)?.to_string())
            .sep()
            .push_bytes(&password4(password))
            .finish();
        Ok(Self::new(Command::OpenNonFiscalReceipt, payload))
    }

    pub fn open_fiscal_receipt(op: u8, password: &str, detailed: bool, vat: bool) -> Result<Self> {
        let payload = PayloadBuilder::new()
            .push_str(&operator(op)?.to_string())
            .sep()
            .push_bytes(&password4(password))
            .sep()
            .flag(detailed)
            .sep()
            .flag(vat)
            .push_str(";2")
            .finish();
        Ok(Self::new(Command::OpenFiscalReceipt, payload))
    }

    pub fn open_invoice(op: u8, password: &str, invoice: &InvoiceDetails<'_>) -> Result<Self> {
        let payload = PayloadBuilder::new()
            .push_str(&operator(op)?.to_string())
            .sep()
            .push_bytes(&password4(password))
            .push_str(";0;0;1;")
            .text(invoice.client, 26)
            .sep()
            .text(invoice.receiver, 16)
            .sep()
            .text(invoice.tax_number, 13)
            .sep()
            .text(invoice.bulstat, 13)
            .sep()
            .text(invoice.address, 30)
            .finish();
        Ok(Self::new(Command::OpenFiscalReceipt, payload))
    }

    /// Sell an item described by the host
    pub fn sell_free(
        name: &str,
        group: TaxGroup,
        price: f64,
        quantity: f64,
        discount: f64,
    ) -> Result<Self> {
        check_amount("price", price, -99_999_999.0, 99_999_999.0)?;
        check_amount("quantity", quantity, 0.0, 999_999.999)?;
        check_amount("discount", discount, -999.0, 999.0)?;

        let builder = PayloadBuilder::new()
            .text(name, 36)
            .sep()
            .push_char(group.as_char())
            .sep()
            .push_str(&encoding::amount(price, 2)?)
            .push_char('*')
            .push_str(&encoding::amount(quantity, 3)?);

        let payload = discount_suffix(builder, discount)?.finish();
        Ok(Self::new(Command::SellFree, payload))
    }

    /// Sell or void an item from the device database
    pub fn sell_from_database(void: bool, number: u32, quantity: f64, discount: f64) -> Result<Self> {
        check_range("article number", number, 0, 99_999)?;
        check_amount("quantity", quantity, 0.0, 9_999_999_999.0)?;
        check_amount("discount", discount, -999.0, 999.0)?;

        let builder = PayloadBuilder::new()
            .push_char(if void { '-' } else { '+' })
            .sep()
            .push_str(&encoding::number(number, 5))
            .push_char('*')
            .push_str(&encoding::amount(quantity, 3)?);

        let payload = discount_suffix(builder, discount)?.finish();
        Ok(Self::new(Command::SellFromDatabase, payload))
    }

    pub fn subtotal(print: bool, display: bool, discount: Option<Discount>) -> Result<Self> {
        let mut builder = PayloadBuilder::new().flag(print).sep().flag(display);

        builder = match discount {
            Some(Discount::Percent(value)) => {
                check_amount("discount", value, f64::MIN, f64::MAX)?;
                discount_suffix(builder, value)?
            }
            Some(Discount::Amount(value)) if value != 0.0 => builder
                .push_char(':')
                .push_str(&encoding::amount(value, 2)?),
            Some(Discount::Amount(value)) => {
                check_amount("discount", value, f64::MIN, f64::MAX)?;
                builder
            }
            None => builder,
        };

        Ok(Self::new(Command::Subtotal, builder.finish()))
    }

    /// Register a payment; `no_change` suppresses change for payment types that support it
    pub fn payment(kind: u8, sum: f64, no_change: bool) -> Result<Self> {
        check_range("payment type", kind, 0, 4)?;
        check_amount("sum", sum, 0.0, 9_999_999_999.0)?;

        let payload = PayloadBuilder::new()
            .push_str(&kind.to_string())
            .sep()
            .flag(no_change)
            .sep()
            .push_str(&encoding::amount(sum, 2)?)
            .finish();
        Ok(Self::new(Command::Payment, payload))
    }

    /// Free text line; text of 34 characters or more is always left aligned
    pub fn print_text(text: &str, align: Align) -> Self {
        Self::new(Command::PrintText, encoding::fixed(text, PRINT_WIDTH, align))
    }

    /// Paid out (negative) or received on account sums
    pub fn official_sums(op: u8, password: &str, kind: u8, sum: f64) -> Result<Self> {
        let op = operator(op)?;
        check_range("payment type", kind, 0, 3)?;
        check_amount("sum", sum, -999_999_999.0, 9_999_999_999.0)?;

        let payload = PayloadBuilder::new()
            .push_str(&op.to_string())
            .sep()
            .push_bytes(&password4(password))
            .sep()
            .push_str(&kind.to_string())
            .sep()
            .push_str(&encoding::amount(sum, 2)?)
            .finish();
        Ok(Self::new(Command::OfficialSums, payload))
    }

    // Queries with arguments

    pub fn get_header_line(line: u8) -> Result<Self> {
        check_range("header line", line, 1, 8)?;
        Ok(Self::new(Command::GetHeaderLine, line.to_string()))
    }

    pub fn get_operator_info(op: u8) -> Result<Self> {
        Ok(Self::new(Command::GetOperatorInfo, operator(op)?.to_string()))
    }

    pub fn get_article_info(number: u32) -> Result<Self> {
        check_range("article number", number, 0, 1000)?;
        Ok(Self::new(Command::GetArticleInfo, encoding::number(number, 5)))
    }

    // Setup

    pub fn set_pay_type(kind: u8, name: &str) -> Result<Self> {
        check_range("payment type", kind, 1, 3)?;
        let payload = PayloadBuilder::new()
            .push_str(&kind.to_string())
            .sep()
            .text_max(name, 10)
            .finish();
        Ok(Self::new(Command::SetPayType, payload))
    }

    pub fn set_parameters(
        pos_number: u32,
        print_logo: bool,
        open_till: bool,
        auto_cut: bool,
        transparent_display: bool,
    ) -> Result<Self> {
        check_range("POS number", pos_number, 0, 9999)?;
        let payload = PayloadBuilder::new()
            .push_str(&encoding::number(pos_number, 4))
            .sep()
            .flag(print_logo)
            .sep()
            .flag(open_till)
            .sep()
            .flag(auto_cut)
            .sep()
            .flag(transparent_display)
            .finish();
        Ok(Self::new(Command::SetParameters, payload))
    }

    /// `DD-MM-YY HH:MM:SS`
    pub fn set_date_time(at: NaiveDateTime) -> Self {
        Self::new(
            Command::SetDateTime,
            at.format("%d-%m-%y %H:%M:%S").to_string(),
        )
    }

    pub fn set_header_line(line: u8, text: &str) -> Result<Self> {
        check_range("header line", line, 1, 8)?;
        let payload = PayloadBuilder::new()
            .push_str(&line.to_string())
            .sep()
            .text_max(text, 38)
            .finish();
        Ok(Self::new(Command::SetHeaderLine, payload))
    }

    pub fn set_operator(op: u8, name: &str, password: &str) -> Result<Self> {
        let payload = PayloadBuilder::new()
            .push_str(&operator(op)?.to_string())
            .sep()
            .text(name, 20)
            .sep()
            .push_bytes(&password4(password))
            .finish();
        Ok(Self::new(Command::SetOperator, payload))
    }

    pub fn set_article(number: u32, name: &str, price: f64, group: TaxGroup) -> Result<Self> {
        check_range("article number", number, 0, 1000)?;
        check_amount("price", price, -999_999_999.0, 9_999_999_999.0)?;

        let payload = PayloadBuilder::new()
            .push_str(&encoding::number(number, 5))
            .sep()
            .text(name, 20)
            .sep()
            .push_str(&encoding::amount(price, 2)?)
            .sep()
            .push_char(group.as_char())
            .finish();
        Ok(Self::new(Command::SetArticle, payload))
    }

    // Reports

    pub fn report_fiscal_by_block(detailed: bool, start: u32, end: u32) -> Result<Self> {
        check_range("start block", start, 0, 9999)?;
        check_range("end block", end, 0, 9999)?;

        let command = if detailed {
            Command::ReportFiscalByBlockDetailed
        } else {
            Command::ReportFiscalByBlockBrief
        };
        let payload = format!(
            "{};{}",
            encoding::number(start, 4),
            encoding::number(end, 4)
        );
        Ok(Self::new(command, payload))
    }

    /// `DDMMYY;DDMMYY`
    pub fn report_fiscal_by_date(detailed: bool, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::invalid(format!(
                "report start {} is after end {}",
                start, end
            )));
        }

        let command = if detailed {
            Command::ReportFiscalByDateDetailed
        } else {
            Command::ReportFiscalByDateBrief
        };
        let payload = format!("{};{}", start.format("%d%m%y"), end.format("%d%m%y"));
        Ok(Self::new(command, payload))
    }

    pub fn report_daily(mode: ReportMode, extended: bool) -> Self {
        let command = if extended {
            Command::ReportDailyExtended
        } else {
            Command::ReportDaily
        };
        Self::new(command, mode.as_char().to_string())
    }

    /// Operator 0 reports all operators
    pub fn report_operator(mode: ReportMode, op: u8) -> Result<Self> {
        check_range("operator", op, 0, 9)?;
        Ok(Self::new(
            Command::ReportOperator,
            format!("{};{}", mode.as_char(), op),
        ))
    }

    pub fn report_articles(mode: ReportMode) -> Self {
        Self::new(Command::ReportArticles, mode.as_char().to_string())
    }

    // Service

    pub fn set_external_display(password: &str, data: &[u8]) -> Result<Self> {
        if data.len() > MAX_DISPLAY_DATA {
            return Err(Error::invalid(format!(
                "display data is {} bytes, at most {} allowed",
                data.len(),
                MAX_DISPLAY_DATA
            )));
        }
        let payload = PayloadBuilder::new()
            .push_bytes(&password6(password))
            .push_bytes(data)
            .finish();
        Ok(Self::new(Command::SetExternalDisplay, payload))
    }

    pub fn set_serial_number(password: &str, factory: &str, fiscal: &str, check: &str) -> Self {
        let payload = PayloadBuilder::new()
            .push_bytes(&password6(password))
            .sep()
            .text(factory, 6)
            .sep()
            .text(fiscal, 6)
            .sep()
            .text(check, 6)
            .finish();
        Self::new(Command::SetSerialNumber, payload)
    }

    pub fn set_tax_number(password: &str, tax_number: &str, fiscal: &str) -> Self {
        let payload = PayloadBuilder::new()
            .push_bytes(&password6(password))
            .push_str(";1;")
            .text(tax_number, 15)
            .sep()
            .text(fiscal, 12)
            .finish();
        Self::new(Command::SetTaxNumber, payload)
    }

    pub fn make_fiscal(password: &str) -> Self {
        let payload = PayloadBuilder::new()
            .push_bytes(&password6(password))
            .push_str(";2")
            .finish();
        Self::new(Command::MakeFiscal, payload)
    }

    pub fn set_tax_percents(password: &str, rates: [f64; 3]) -> Result<Self> {
        let mut builder = PayloadBuilder::new().push_bytes(&password6(password));
        for rate in rates {
            check_amount("tax rate", rate, f64::MIN, 100.0)?;
            builder = builder.sep().push_str(&encoding::rate(rate)?);
        }
        Ok(Self::new(Command::SetTaxPercents, builder.finish()))
    }

    pub fn set_decimal_point(password: &str, point: u8) -> Result<Self> {
        check_range("decimal point", point, 0, 9)?;
        let payload = PayloadBuilder::new()
            .push_bytes(&password6(password))
            .sep()
            .push_str(&point.to_string())
            .finish();
        Ok(Self::new(Command::SetDecimalPoint, payload))
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("command", &self.command)
            .field("payload", &String::from_utf8_lossy(&self.payload))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(req: &Request) -> String {
        String::from_utf8_lossy(&req.payload).into_owned()
    }

    fn group(c: char) -> TaxGroup {
        TaxGroup::new(c).unwrap()
    }

    #[test]
    fn test_open_fiscal_receipt() {
        let req = Request::open_fiscal_receipt(1, "0000", false, false).unwrap();
        assert_eq!(req.command, Command::OpenFiscalReceipt);
        assert_eq!(text(&req), "1;0000;0;0;2");

        let req = Request::open_fiscal_receipt(9, "12", true, true).unwrap();
        assert_eq!(text(&req), "9;12  ;1;1;2");
    }

    #[test]
    fn test_operator_range() {
        for op in [0, 10] {
            let err = Request::open_fiscal_receipt(op, "0000", false, false).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
        assert!(Request::open_non_fiscal_receipt(0, "0000").is_err());
        assert!(Request::official_sums(10, "0000", 0, 1.0).is_err());
    }

    #[test]
    fn test_open_invoice_layout() {
        let invoice = InvoiceDetails {
            client: "ACME",
            receiver: "Ivan",
            tax_number: "123",
            bulstat: "456",
            address: "Sofia",
        };
        let req = Request::open_invoice(2, "1", &invoice).unwrap();
        let fields: Vec<String> = text(&req).split(';').map(str::to_owned).collect();

        assert_eq!(fields.len(), 10);
        assert_eq!(&fields[..5], ["2", "1   ", "0", "0", "1"]);
        assert_eq!(fields[5].len(), 26);
        assert_eq!(fields[6].len(), 16);
        assert_eq!(fields[7].len(), 13);
        assert_eq!(fields[8].len(), 13);
        assert_eq!(fields[9].len(), 30);
        assert_eq!(fields[9].trim_end(), "Sofia");
    }

    #[test]
    fn test_sell_free() {
        let req = Request::sell_free("Bread", group('B'), 1.5, 2.0, 0.0).unwrap();
        assert_eq!(
            text(&req),
            format!("{:<36};B;0000001.50*000002.000", "Bread")
        );
    }

    #[test]
    fn test_sell_free_with_discount() {
        let req = Request::sell_free("Milk", group('2'), 2.0, 1.0, -10.0).unwrap();
        assert!(text(&req).ends_with("0000002.00*000001.000,-10.00%"));
    }

    #[test]
    fn test_sell_free_bounds() {
        assert!(Request::sell_free("x", group('A'), 100_000_000.0, 1.0, 0.0).is_err());
        assert!(Request::sell_free("x", group('A'), 1.0, -1.0, 0.0).is_err());
        assert!(Request::sell_free("x", group('A'), 1.0, 1_000_000.0, 0.0).is_err());
        assert!(Request::sell_free("x", group('A'), 1.0, 1.0, 1000.0).is_err());
        assert!(matches!(
            Request::sell_free("x", group('A'), f64::NAN, 1.0, 0.0),
            Err(Error::NonFinite(_))
        ));
    }

    #[test]
    fn test_tax_group() {
        assert!(TaxGroup::new('А').is_ok());
        assert!(TaxGroup::new(';').is_err());
        assert!(TaxGroup::try_from(' ').is_err());
    }

    #[test]
    fn test_sell_from_database() {
        let req = Request::sell_from_database(true, 42, 1.0, 5.0).unwrap();
        assert_eq!(text(&req), "-;00042*000001.000,  5.00%");

        let req = Request::sell_from_database(false, 7, 3.0, 0.0).unwrap();
        assert_eq!(text(&req), "+;00007*000003.000");
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(text(&Request::subtotal(true, false, None).unwrap()), "1;0");
        assert_eq!(
            text(&Request::subtotal(true, true, Some(Discount::Percent(-5.0))).unwrap()),
            "1;1, -5.00%"
        );
        assert_eq!(
            text(&Request::subtotal(false, false, Some(Discount::Amount(3.0))).unwrap()),
            "0;0:0000003.00"
        );
        assert_eq!(
            text(&Request::subtotal(false, false, Some(Discount::Percent(0.0))).unwrap()),
            "0;0"
        );
        assert!(Request::subtotal(false, false, Some(Discount::Amount(f64::NAN))).is_err());
    }

    #[test]
    fn test_payment() {
        let req = Request::payment(0, 5.29, false).unwrap();
        assert_eq!(text(&req), "0;0;0000005.29");
        assert!(Request::payment(5, 1.0, false).is_err());
        assert!(Request::payment(0, -1.0, false).is_err());
    }

    #[test]
    fn test_official_sums_bounds_differ_from_payment() {
        assert!(Request::official_sums(1, "0000", 3, -100.0).is_ok());
        assert!(Request::official_sums(1, "0000", 4, 1.0).is_err());
        assert_eq!(
            text(&Request::official_sums(3, "0000", 1, 10.0).unwrap()),
            "3;0000;1;0000010.00"
        );
    }

    #[test]
    fn test_print_text_alignment() {
        let req = Request::print_text("hi", Align::Right);
        assert_eq!(req.payload.len(), PRINT_WIDTH);
        assert!(text(&req).ends_with(" hi"));

        let long = "x".repeat(40);
        let req = Request::print_text(&long, Align::Center);
        assert_eq!(text(&req), "x".repeat(34));
    }

    #[test]
    fn test_display_lines_are_padded() {
        assert_eq!(Request::display_line1("A").payload.len(), 20);
        assert_eq!(Request::display("A").payload.len(), 40);
    }

    #[test]
    fn test_set_date_time() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        assert_eq!(text(&Request::set_date_time(at)), "07-03-24 09:05:01");
    }

    #[test]
    fn test_report_by_date() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let req = Request::report_fiscal_by_date(true, start, end).unwrap();
        assert_eq!(req.command, Command::ReportFiscalByDateDetailed);
        assert_eq!(text(&req), "310124;010224");

        assert!(Request::report_fiscal_by_date(false, end, start).is_err());
    }

    #[test]
    fn test_report_by_block() {
        let req = Request::report_fiscal_by_block(false, 1, 25).unwrap();
        assert_eq!(req.command, Command::ReportFiscalByBlockBrief);
        assert_eq!(text(&req), "0001;0025");
        assert!(Request::report_fiscal_by_block(false, 0, 10_000).is_err());
    }

    #[test]
    fn test_reports() {
        let req = Request::report_daily(ReportMode::Z, true);
        assert_eq!(req.command, Command::ReportDailyExtended);
        assert_eq!(text(&req), "Z");

        assert_eq!(text(&Request::report_operator(ReportMode::X, 0).unwrap()), "X;0");
        assert!(Request::report_operator(ReportMode::X, 10).is_err());
    }

    #[test]
    fn test_set_operator_uses_name() {
        let req = Request::set_operator(3, "Maria", "4321").unwrap();
        assert_eq!(text(&req), format!("3;{:<20};4321", "Maria"));
    }

    #[test]
    fn test_set_article() {
        let req = Request::set_article(12, "Cola", 1.2, group('B')).unwrap();
        assert_eq!(text(&req), format!("00012;{:<20};0000001.20;B", "Cola"));
        assert!(Request::set_article(1001, "Cola", 1.2, group('B')).is_err());
    }

    #[test]
    fn test_set_parameters() {
        let req = Request::set_parameters(12, true, false, true, false).unwrap();
        assert_eq!(text(&req), "0012;1;0;1;0");
        assert!(Request::set_parameters(10_000, true, true, true, true).is_err());
    }

    #[test]
    fn test_shared_command_bytes() {
        let pay = Request::set_pay_type(1, "Card").unwrap();
        let header = Request::set_header_line(1, "Shop").unwrap();
        assert_eq!(pay.command.code(), header.command.code());
        assert_eq!(text(&pay), "1;Card");
        assert!(Request::set_pay_type(0, "Cash").is_err());
        assert!(Request::set_header_line(9, "x").is_err());
    }

    #[test]
    fn test_service_commands() {
        assert_eq!(
            text(&Request::set_serial_number("pw", "AB", "CD", "EF")),
            "pw    ;AB    ;CD    ;EF    "
        );
        assert_eq!(text(&Request::make_fiscal("123456")), "123456;2");
        assert_eq!(
            text(&Request::set_tax_percents("pw", [0.0, 20.0, 9.0]).unwrap()),
            "pw    ;0.00%;20.00%;9.00%"
        );
        assert!(Request::set_tax_percents("pw", [0.0, 101.0, 9.0]).is_err());
        assert_eq!(text(&Request::set_decimal_point("pw", 2).unwrap()), "pw    ;2");
    }

    #[test]
    fn test_external_display_limit() {
        let req = Request::set_external_display("pw", &[0x41; 101]).unwrap();
        assert_eq!(req.payload.len(), 107);
        assert!(Request::set_external_display("pw", &[0x41; 102]).is_err());
    }
}
