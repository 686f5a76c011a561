// Reading survey responses exported as Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use nota_voting::Ballot;
use snafu::prelude::*;

use crate::judge::io_common::{row_to_ballot, ConvertOptions};
use crate::judge::*;

pub fn read_xlsx_ballots(path: &str, opts: &ConvertOptions) -> JudgeResult<Vec<Ballot>> {
    let wrange = get_range(path, opts)?;

    let mut res: Vec<Ballot> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = idx + 1;
        let cells: Vec<String> = row
            .iter()
            .map(|dt| cell_to_string(dt, lineno))
            .collect::<JudgeResult<Vec<String>>>()?;
        debug!("read_xlsx_ballots: lineno: {:?} row: {:?}", lineno, &cells);
        if let Some(ballot) = row_to_ballot(&cells, lineno, opts)? {
            res.push(ballot);
        }
    }
    Ok(res)
}

fn cell_to_string(dt: &DataType, lineno: usize) -> JudgeResult<String> {
    match dt {
        DataType::Empty => Ok(String::new()),
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        // Ranks typed as numbers come back as floats.
        DataType::Float(f) if f.fract() == 0.0 && *f >= 0.0 => Ok(format!("{}", *f as u64)),
        DataType::Float(f) | DataType::DateTime(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        other => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", other),
        }
        .fail(),
    }
}

fn get_range(path: &str, opts: &ConvertOptions) -> JudgeResult<calamine::Range<DataType>> {
    let worksheet_name_o = opts.excel_worksheet_name.clone();
    debug!(
        "read_xlsx_ballots: path: {:?} worksheet: {:?}",
        path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet)
            .context(MissingWorksheetSnafu {
                path,
                worksheet: worksheet.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_xlsx_ballots: path: {:?} worksheet: {:?}",
                    path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => whatever!(
                "the Excel file {} has several worksheets, --excel-worksheet-name must be provided",
                path
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::Empty, 1).unwrap(), "");
        assert_eq!(
            cell_to_string(&DataType::String("Rank 2".to_string()), 1).unwrap(),
            "Rank 2"
        );
        assert_eq!(cell_to_string(&DataType::Float(3.0), 1).unwrap(), "3");
        assert_eq!(cell_to_string(&DataType::Int(4), 1).unwrap(), "4");
        assert!(matches!(
            cell_to_string(
                &DataType::Error(calamine::CellErrorType::NA),
                7
            )
            .unwrap_err(),
            JudgeError::ExcelWrongCellType { lineno: 7, .. }
        ));
    }

    #[test]
    fn missing_workbook() {
        let opts = ConvertOptions {
            columns: vec![],
            voter_column: 1,
            exclude_voters: Default::default(),
            unranked_rank: 1,
            excel_worksheet_name: None,
        };
        assert!(matches!(
            read_xlsx_ballots("/nonexistent/responses.xlsx", &opts).unwrap_err(),
            JudgeError::OpeningExcel { .. }
        ));
    }
}
