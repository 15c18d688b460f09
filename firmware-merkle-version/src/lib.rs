pub mod error;
pub mod version;


/// Return early with an `UnknownVersionMismatch` error (and zero cost) unless
/// `$version` is 0.
///
/// The calling function must return a `CostResult` whose error type converts
/// from `MerkleVersionError`, and must have `CostsExt` and `OperationCost` in
/// scope.
#[macro_export]
macro_rules! check_v0 {
    ($method:expr, $version:expr) => {
        {
            const EXPECTED_VERSION: u16 = 0;
            if $version != EXPECTED_VERSION {
                return Err($crate::error::MerkleVersionError::UnknownVersionMismatch {
                    method: $method.to_string(),
                    known_versions: vec![EXPECTED_VERSION],
                    received: $version,
                }
                .into())
                .wrap_with_cost(OperationCost::default());
            }
        }
    };
}
