/// Failure reason reported by a resource's close operation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A resource the coordinator can shut down.
///
/// The single required operation is a blocking `close`; what it does
/// internally is the resource's business. The coordinator tracks resources
/// by position, never by value, so implementors need no `Eq`/`Hash` and may
/// be backed by unordered collections.
pub trait Closeable: Send + Sync {
    /// Name used in log lines. Purely cosmetic.
    fn name(&self) -> &str {
        "closeable"
    }

    /// Blocks until the resource has shut down, or reports why it could not.
    fn close(&self) -> Result<(), BoxError>;
}
