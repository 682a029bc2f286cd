//! Flattened, row-per-statement-line CSV export.
//!
//! Every row repeats the message envelope (references, account, statement
//! number and balances) next to one statement line. Absent optional fields
//! are empty cells. Dates are ISO `YYYY-MM-DD`, amounts use a decimal point.

use std::io;

use crate::grammar::ast::{Balance, Message, StatementSection};

/// Column names, in output order.
pub const CSV_HEADER: [&str; 28] = [
    "tag20",
    "tag21",
    "tag25_account",
    "tag25_ident_code",
    "tag28_stmt_number",
    "tag28_seq_number",
    "tag60_dc_mark",
    "tag60_date",
    "tag60_currency",
    "tag60_amount",
    "tag61_value_date",
    "tag61_entry_date",
    "tag61_dc_mark",
    "tag61_funds_code",
    "tag61_amount",
    "tag61_trx_ident",
    "tag61_owner_ref",
    "tag61_institution_ref",
    "tag61_details",
    "tag86",
    "tag62_dc_mark",
    "tag62_date",
    "tag62_currency",
    "tag62_amount",
    "tag64_dc_mark",
    "tag64_date",
    "tag64_currency",
    "tag64_amount",
];

fn balance_cells(balance: Option<&Balance>) -> [String; 4] {
    match balance {
        Some(b) => [
            b.dc_mark.to_string(),
            b.date.date().to_string(),
            b.currency.clone(),
            b.amount.value().to_string(),
        ],
        None => Default::default(),
    }
}

fn row(msg: &Message, section: &StatementSection) -> Vec<String> {
    let line = &section.statement;
    let mut cells = vec![
        msg.transaction_ref_no.clone(),
        msg.related_reference.clone().unwrap_or_default(),
        msg.account_identification.account.clone(),
        msg.account_identification
            .ident_code
            .clone()
            .unwrap_or_default(),
        msg.statement_number.statement_no.clone(),
        msg.statement_number.sequence_no.clone().unwrap_or_default(),
    ];
    cells.extend(balance_cells(Some(&msg.opening_balance)));
    cells.extend([
        line.value_date.date().to_string(),
        line.entry_date
            .map(|d| d.date().to_string())
            .unwrap_or_default(),
        line.dc_mark.to_string(),
        line.funds_code.clone().unwrap_or_default(),
        line.amount.value().to_string(),
        line.transaction_ident.clone(),
        line.reference.clone(),
        line.institution_reference.clone().unwrap_or_default(),
        line.details.clone().unwrap_or_default(),
        section.owner_info.join(" "),
    ]);
    cells.extend(balance_cells(Some(&msg.closing_balance)));
    cells.extend(balance_cells(msg.closing_available_balance.as_ref()));
    cells
}

/// Write the header and one row per statement line of every message.
///
/// Messages without statement lines contribute no rows.
pub fn write_csv<W: io::Write>(messages: &[Message], writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for msg in messages {
        for section in &msg.statements {
            out.write_record(row(msg, section))?;
        }
    }
    out.flush()?;
    Ok(())
}

/// [`write_csv`] into a `String`.
pub fn to_csv_string(messages: &[Message]) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(messages, &mut buf)?;
    String::from_utf8(buf).map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    const INPUT: &str = ":20:REF1\r\n:25:ACC1\r\n:28C:1\r\n:60F:C230101EUR100,00\r\n\
                         :61:2301020102D50,00NMSCOWN\r\n:86:LINE ONE\r\nLINE TWO\r\n\
                         :61:230103C20,NTRFOTHER,REF\r\n\
                         :62F:C230103EUR70,00\r\n";

    #[test]
    fn one_row_per_statement_line() {
        let msg = parse_str(INPUT).unwrap();
        let csv = to_csv_string(&[msg]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), CSV_HEADER.len());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(&first[0], "REF1");
        assert_eq!(&first[1], "");
        assert_eq!(&first[7], "2023-01-01");
        assert_eq!(&first[9], "100.00");
        assert_eq!(&first[11], "2023-01-02");
        assert_eq!(&first[14], "50.00");
        assert_eq!(&first[19], "LINE ONE LINE TWO");
        assert_eq!(&first[23], "70.00");
        assert_eq!(&first[27], "");

        let second = &rows[1];
        assert_eq!(&second[0], "REF1");
        assert_eq!(&second[16], "OTHER,REF");
        assert_eq!(&second[19], "");
    }

    #[test]
    fn zero_statement_message_has_only_header() {
        let msg = parse_str(
            ":20:REF1\r\n:25:ACC1\r\n:28C:1\r\n:60F:C230101EUR1,\r\n:62F:C230101EUR1,\r\n",
        )
        .unwrap();
        let csv = to_csv_string(&[msg]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("tag20,tag21,"));
    }
}
