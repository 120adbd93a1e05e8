use std::fmt::{self, Display, Formatter};

use chrono::TimeZone;
use comfy_table::presets::UTF8_HORIZONTAL_BORDERS_ONLY;
use comfy_table::{Cell, ContentArrangement, Row, Table, TableComponent};
use winq_array::{ArrayExt, DataType, Scalar};

use crate::DataSet;

pub struct DataSetDisplay<'a> {
    dataset: &'a DataSet,
    no_header: bool,
}

impl DataSet {
    pub fn display(&self) -> DataSetDisplay<'_> {
        DataSetDisplay {
            dataset: self,
            no_header: false,
        }
    }

    pub fn display_no_header(&self) -> DataSetDisplay<'_> {
        DataSetDisplay {
            dataset: self,
            no_header: true,
        }
    }
}

fn format_cell(value: Scalar, data_type: DataType) -> String {
    match (value, data_type) {
        (Scalar::Timestamp(millis), DataType::Timestamp(Some(tz))) => {
            tz.timestamp_millis(millis).to_string()
        }
        (value, _) => value.to_string(),
    }
}

impl<'a> Display for DataSetDisplay<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::DynamicFullWidth);
        table.load_preset(UTF8_HORIZONTAL_BORDERS_ONLY);

        let schema = self.dataset.schema();
        if !self.no_header {
            table.set_header(schema.fields().iter().map(|field| &field.name));
        } else {
            table.remove_style(TableComponent::TopBorder);
            table.remove_style(TableComponent::TopBorderIntersections);
        }

        if self.dataset.is_empty() {
            table.add_row(Row::from(vec!["No data!"]));
        } else {
            for row in 0..self.dataset.len() {
                let mut table_row = Row::new();
                for (column, field) in self.dataset.columns().iter().zip(schema.fields()) {
                    table_row.add_cell(Cell::new(format_cell(
                        column.scalar_value(row),
                        field.data_type,
                    )));
                }
                table.add_row(table_row);
            }
        }

        table.fmt(f)
    }
}
