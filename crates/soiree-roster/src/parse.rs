//! Roster CSV reader.
//!
//! Pipeline:
//!   raw &str
//!     └─ read_records()   → Vec<Vec<String>>
//!          └─ Columns::locate() on the header row
//!               └─ NewGuest::new() per data row → ParsedRoster

use soiree_core::guest::NewGuest;

use crate::{
  ParsedRoster,
  error::{Error, Result},
};

// ─── Record reader ───────────────────────────────────────────────────────────

/// Split `input` into records of fields per RFC 4180 §2.
///
/// Handles quoted fields, doubled-quote escapes and line breaks inside
/// quotes. Tolerates bare LF record endings and a leading UTF-8 BOM, both
/// common in real spreadsheet exports. Records whose fields are all blank
/// are dropped.
pub(crate) fn read_records(input: &str) -> Result<Vec<Vec<String>>> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input);

  let mut records: Vec<Vec<String>> = Vec::new();
  let mut record: Vec<String> = Vec::new();
  let mut field = String::new();
  let mut in_quotes = false;
  let mut line = 1usize;
  let mut quote_line = 1usize;

  let mut chars = input.chars().peekable();
  while let Some(c) = chars.next() {
    if in_quotes {
      match c {
        '"' => {
          if chars.peek() == Some(&'"') {
            chars.next();
            field.push('"');
          } else {
            in_quotes = false;
          }
        }
        '\n' => {
          line += 1;
          field.push(c);
        }
        _ => field.push(c),
      }
      continue;
    }

    match c {
      // A quote only opens a quoted field at the start of the field;
      // anywhere else it is literal text.
      '"' if field.is_empty() => {
        in_quotes = true;
        quote_line = line;
      }
      ',' => {
        record.push(field);
        field = String::new();
      }
      // CRLF: drop the CR, the LF below ends the record.
      '\r' if chars.peek() == Some(&'\n') => {}
      '\n' => {
        line += 1;
        record.push(field);
        field = String::new();
        flush_record(&mut records, &mut record);
      }
      _ => field.push(c),
    }
  }

  if in_quotes {
    return Err(Error::UnterminatedQuote(quote_line));
  }
  // Final record when the file does not end with a newline.
  if !field.is_empty() || !record.is_empty() {
    record.push(field);
    flush_record(&mut records, &mut record);
  }

  Ok(records)
}

/// Keep `record` unless every field is blank.
fn flush_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>) {
  if record.iter().any(|f| !f.trim().is_empty()) {
    records.push(record.clone());
  }
  record.clear();
}

// ─── Header detection ────────────────────────────────────────────────────────

/// Column indexes located in the header row.
struct Columns {
  name:   usize,
  number: Option<usize>,
}

impl Columns {
  /// Locate the name and phone columns, case-insensitively. The first
  /// matching column of each kind wins; other columns are ignored.
  fn locate(header: &[String]) -> Result<Self> {
    let mut name = None;
    let mut number = None;
    for (i, col) in header.iter().enumerate() {
      match col.trim().to_lowercase().as_str() {
        "name" if name.is_none() => name = Some(i),
        "phone" | "phone number" | "number" if number.is_none() => {
          number = Some(i)
        }
        _ => {}
      }
    }
    Ok(Self {
      name: name.ok_or(Error::MissingNameColumn)?,
      number,
    })
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

pub(crate) fn parse_roster(input: &str) -> Result<ParsedRoster> {
  let records = read_records(input)?;
  let Some((header, rows)) = records.split_first() else {
    return Err(Error::Empty);
  };
  let columns = Columns::locate(header)?;

  let mut guests = Vec::new();
  let mut skipped = 0usize;
  for row in rows {
    let name = row.get(columns.name).cloned().unwrap_or_default();
    let number = columns.number.and_then(|i| row.get(i)).cloned();
    match NewGuest::new(name, number) {
      Ok(guest) => guests.push(guest),
      // The only constructor failure is an empty name.
      Err(_) => skipped += 1,
    }
  }

  Ok(ParsedRoster { guests, skipped })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  // ── Record reader ──────────────────────────────────────────────────────────

  #[test]
  fn reads_crlf_and_bare_lf_endings() {
    let records = read_records("a,b\r\nc,d\ne,f").unwrap();
    assert_eq!(records, vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]]);
  }

  #[test]
  fn quoted_fields_keep_commas_quotes_and_newlines() {
    let records =
      read_records("\"Lovelace, Ada\",\"says \"\"hi\"\"\",\"line\nbreak\"\r\n")
        .unwrap();
    assert_eq!(records, vec![vec![
      "Lovelace, Ada",
      "says \"hi\"",
      "line\nbreak",
    ]]);
  }

  #[test]
  fn blank_records_are_dropped() {
    let records = read_records("a\r\n\r\n,,\r\nb\r\n\r\n").unwrap();
    assert_eq!(records, vec![vec!["a"], vec!["b"]]);
  }

  #[test]
  fn leading_bom_is_stripped() {
    let records = read_records("\u{feff}Name\r\nAda\r\n").unwrap();
    assert_eq!(records[0], vec!["Name"]);
  }

  #[test]
  fn unterminated_quote_reports_its_line() {
    let err = read_records("Name\r\n\"Ada").unwrap_err();
    assert!(matches!(err, Error::UnterminatedQuote(2)), "got: {err}");
  }

  // ── Header detection ───────────────────────────────────────────────────────

  #[test]
  fn header_matching_is_case_insensitive() {
    let input = "NAME,PHONE NUMBER\r\nAda Lovelace,555-0100\r\n";
    let parsed = parse_roster(input).unwrap();
    assert_eq!(parsed.guests.len(), 1);
    assert_eq!(parsed.guests[0].name(), "Ada Lovelace");
    assert_eq!(parsed.guests[0].number(), Some("555-0100"));
  }

  #[test]
  fn phone_column_aliases() {
    for phone_col in ["Phone", "Phone Number", "Number"] {
      let input = format!("Name,{phone_col}\r\nAda,555-0100\r\n");
      let parsed = parse_roster(&input).unwrap();
      assert_eq!(
        parsed.guests[0].number(),
        Some("555-0100"),
        "alias {phone_col} not recognised"
      );
    }
  }

  #[test]
  fn phone_column_is_optional() {
    let parsed = parse_roster("Name\r\nAda Lovelace\r\n").unwrap();
    assert_eq!(parsed.guests.len(), 1);
    assert_eq!(parsed.guests[0].number(), None);
  }

  #[test]
  fn unknown_columns_are_ignored() {
    let input = "Status,Name,Checked In At\r\nnot-checked-in,Ada,\r\n";
    let parsed = parse_roster(input).unwrap();
    assert_eq!(parsed.guests.len(), 1);
    assert_eq!(parsed.guests[0].name(), "Ada");
  }

  #[test]
  fn missing_name_column_is_rejected() {
    let err = parse_roster("Phone,Email\r\n555-0100,a@b.com\r\n").unwrap_err();
    assert!(matches!(err, Error::MissingNameColumn));
  }

  #[test]
  fn empty_input_is_rejected() {
    assert!(matches!(parse_roster(""), Err(Error::Empty)));
    assert!(matches!(parse_roster("\r\n\r\n"), Err(Error::Empty)));
  }

  // ── Row handling ───────────────────────────────────────────────────────────

  #[test]
  fn rows_parse_in_order() {
    let input = "Name\r\nAda\r\nGrace\r\nEdsger\r\n";
    let parsed = parse_roster(input).unwrap();
    let names: Vec<_> = parsed.guests.iter().map(|g| g.name()).collect();
    assert_eq!(names, ["Ada", "Grace", "Edsger"]);
    assert_eq!(parsed.skipped, 0);
  }

  #[test]
  fn nameless_rows_are_skipped_and_counted() {
    let input = "Name,Phone\r\nAda,555-0100\r\n,555-0199\r\n   ,555-0123\r\n";
    let parsed = parse_roster(input).unwrap();
    assert_eq!(parsed.guests.len(), 1);
    assert_eq!(parsed.skipped, 2);
  }

  #[test]
  fn header_only_roster_is_empty_but_valid() {
    let parsed = parse_roster("Name,Phone\r\n").unwrap();
    assert!(parsed.guests.is_empty());
    assert_eq!(parsed.skipped, 0);
  }

  #[test]
  fn short_rows_fall_back_to_empty_fields() {
    // Row has a name but no phone cell at all.
    let parsed = parse_roster("Name,Phone\r\nAda\r\n").unwrap();
    assert_eq!(parsed.guests.len(), 1);
    assert_eq!(parsed.guests[0].number(), None);
  }
}
