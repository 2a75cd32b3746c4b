/// The work performed by the producer between control polls.
///
/// Implementations must keep each [`advance`](Computation::advance) call
/// bounded: the producer only services quit and update requests between
/// calls, so an unbounded step delays shutdown by the same amount.
pub trait Computation {
    /// Immutable, self-contained view of the current output.
    type Snapshot;

    /// Perform one bounded unit of work.
    fn advance(&mut self);

    fn snapshot(&self) -> Self::Snapshot;

    fn is_complete(&self) -> bool;
}
