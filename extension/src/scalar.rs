//! Adapter from [`TextFunction`] to DuckDB's vectorised scalar function API.

use std::error::Error;
use std::marker::PhantomData;

use duckdb::core::{DataChunkHandle, Inserter, LogicalTypeHandle, LogicalTypeId};
use duckdb::ffi::duckdb_string_t;
use duckdb::types::DuckString;
use duckdb::vscalar::{ScalarFunctionSignature, VScalar};
use duckdb::vtab::arrow::WritableVector;

use crate::functions::TextFunction;

/// `VARCHAR -> VARCHAR` scalar function backed by `F`.
///
/// NULL input rows produce NULL output rows; every other row is passed
/// through [`TextFunction::apply`].
pub struct TextScalar<F>(PhantomData<F>);

// DuckDB hands `invoke` a chunk whose only column is the VARCHAR vector of
// the registered signature, holding `input.len()` rows.
#[allow(unsafe_code)]
impl<F: TextFunction> VScalar for TextScalar<F> {
    type State = ();

    fn invoke(
        _state: &Self::State,
        input: &mut DataChunkHandle,
        output: &mut dyn WritableVector,
    ) -> Result<(), Box<dyn Error>> {
        let len = input.len();
        let source = input.flat_vector(0);
        let values = unsafe { source.as_slice_with_len::<duckdb_string_t>(len) };
        let mut target = output.flat_vector();

        for (row, value) in values.iter().enumerate() {
            if source.row_is_null(u64::try_from(row)?) {
                target.set_null(row);
                continue;
            }
            let mut raw = *value;
            let text = DuckString::new(&mut raw).as_str().into_owned();
            target.insert(row, F::apply(&text).as_str());
        }
        Ok(())
    }

    fn signatures() -> Vec<ScalarFunctionSignature> {
        vec![ScalarFunctionSignature::exact(
            vec![LogicalTypeHandle::from(LogicalTypeId::Varchar)],
            LogicalTypeHandle::from(LogicalTypeId::Varchar),
        )]
    }
}
