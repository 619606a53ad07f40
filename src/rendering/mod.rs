//! Receipt rendering: document model, sheet layout, paint list, raster.

pub mod layout;
pub mod paint;
pub mod raster;

use base64::Engine as Base64Engine;

use crate::billing::{ChargeBreakdown, ReceiptRecord, ELECTRIC_RATE_PER_UNIT, WATER_RATE_PER_UNIT};
use crate::format;

/// Header line 1: business name.
pub const BUSINESS_NAME: &str = "รุ่งแสงอพาร์ทเมนต์";

/// Header line 2: street address and phone, printed as one line and wrapped
/// by layout when it runs past the sheet.
pub const BUSINESS_ADDRESS: &str =
    "134 หมู่ 1 ซอย ดอดมหาวิจัน ตำบลบางเสาธง อำเภอบางเสาธง สมุทรปราการ 10570 โทร : 092-391-3682";

/// Charge-table column headers, left to right.
pub const COLUMN_HEADERS: [&str; 6] = [
    "รายละเอียด",
    "ต้นเดือน",
    "สิ้นเดือน",
    "จำนวนหน่วย",
    "ราคาต่อหน่วย",
    "จำนวนเงิน",
];

/// Footer payment reminder.
pub const PAYMENT_NOTICE: &str = "*** กรุณาชำระเงินภายในวันที่ 5 ของทุกเดือน ***";

const LABEL_ROOM: &str = "ค่าห้องประจำ (ค่าห้องขั้นต่ำ150บาท)";
const LABEL_WATER: &str = "ค่าน้ำ";
const LABEL_ELECTRIC: &str = "ค่าไฟฟ้า";
const LABEL_GARBAGE: &str = "ค่าขยะ";
const LABEL_PARKING: &str = "ค่าจอดรถ เดือนละ 500 บาท";
const LABEL_TOTAL: &str = "รวมเป็นเงินทั้งหมด";

/// One body row of the charge table. Cell text is pre-formatted at render
/// time; later stages only measure and draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Label plus a dash through each meter column, amount on the right.
    Flat { label: String, amount: String },
    /// Metered utility: readings, usage, unit price, amount.
    Metered {
        label: String,
        start: String,
        end: String,
        units: String,
        unit_price: String,
        amount: String,
    },
    /// Label spanning the detail and meter columns, amount on the right.
    Spanned { label: String, amount: String },
    /// Shaded grand-total row.
    Total { label: String, amount: String },
}

/// A fully rendered slip: every printable string in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptDocument {
    /// Room identifier, used for the export file name.
    pub room_number: String,
    pub business_name: String,
    pub address_line: String,
    /// Room-and-date line, Buddhist-era year.
    pub date_line: String,
    pub rows: Vec<Row>,
    pub payment_notice: String,
}

/// Renders a record and its computed charges into a slip document.
///
/// Deterministic: the same record and breakdown always produce the same
/// document, regardless of fonts or output targets.
pub fn render(record: &ReceiptRecord, breakdown: &ChargeBreakdown) -> ReceiptDocument {
    let rows = vec![
        Row::Flat {
            label: LABEL_ROOM.to_string(),
            amount: format::baht(record.room_rate),
        },
        Row::Metered {
            label: LABEL_WATER.to_string(),
            start: record.water_unit_start.to_string(),
            end: record.water_unit_end.to_string(),
            units: breakdown.water_units.to_string(),
            unit_price: format!("฿{WATER_RATE_PER_UNIT}"),
            amount: format::baht(breakdown.water_cost as f64),
        },
        Row::Metered {
            label: LABEL_ELECTRIC.to_string(),
            start: record.electric_unit_start.to_string(),
            end: record.electric_unit_end.to_string(),
            units: breakdown.electric_units.to_string(),
            unit_price: format!("฿{ELECTRIC_RATE_PER_UNIT}"),
            amount: format::baht(breakdown.electric_cost as f64),
        },
        Row::Spanned {
            label: LABEL_GARBAGE.to_string(),
            amount: format::plain(record.garbage_fee),
        },
        Row::Spanned {
            label: format!(
                "ค่าปรับล่าช้า เกินกำหนด วันสุดท้ายของเดือน - วันที่ 5 ของทุกเดือน ( เกินปรับวันละ 50 บาท ) จำนวน {} วัน",
                record.late_days
            ),
            amount: breakdown.late_fee.to_string(),
        },
        Row::Spanned {
            label: LABEL_PARKING.to_string(),
            amount: breakdown.parking_cost.to_string(),
        },
        Row::Total {
            label: LABEL_TOTAL.to_string(),
            amount: format::grouped(breakdown.total),
        },
    ];

    ReceiptDocument {
        room_number: record.room_number.clone(),
        business_name: BUSINESS_NAME.to_string(),
        address_line: BUSINESS_ADDRESS.to_string(),
        date_line: format::thai_date_line(&record.room_number, record.billing_date),
        rows,
        payment_notice: PAYMENT_NOTICE.to_string(),
    }
}

impl ReceiptDocument {
    /// Builds the document straight from a record, computing charges first.
    pub fn from_record(record: &ReceiptRecord) -> Self {
        render(record, &ChargeBreakdown::compute(record))
    }

    /// A plain-text snapshot of the slip, one table row per line, suitable
    /// for textual tests and quick inspection.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.business_name);
        out.push('\n');
        out.push_str(&self.address_line);
        out.push('\n');
        out.push_str(&self.date_line);
        out.push('\n');
        out.push('\n');
        out.push_str(&COLUMN_HEADERS.join(" | "));
        out.push('\n');
        for row in &self.rows {
            let line = match row {
                Row::Flat { label, amount } => {
                    format!("{label} | - | - | - | - | {amount}")
                }
                Row::Metered {
                    label,
                    start,
                    end,
                    units,
                    unit_price,
                    amount,
                } => format!("{label} | {start} | {end} | {units} | {unit_price} | {amount}"),
                Row::Spanned { label, amount } | Row::Total { label, amount } => {
                    format!("{label} | {amount}")
                }
            };
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.payment_notice);
        out.push('\n');
        out
    }
}

/// A captured bitmap of the slip sheet, PNG-encoded.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Screenshot {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            png_data: Vec::new(),
        }
    }

    /// The capture as a `data:image/png;base64,` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }
}
