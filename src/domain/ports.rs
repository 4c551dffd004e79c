use std::path::Path;

/// Anything that can tell the pipeline where its files live.
pub trait ConfigProvider {
    fn csv_path(&self) -> &Path;
    fn db_path(&self) -> &Path;
    fn num_records(&self) -> usize;
    fn monitoring_enabled(&self) -> bool {
        false
    }
}
