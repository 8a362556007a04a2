/// Report layer: turns the loaded cohort into what the UI draws.
///
/// Architecture:
/// ```text
///   Cohort + selected index
///        │
///        ├──► normalize   raw score → 0–100 against static bounds
///        ├──► trend       grade points → least-squares line + one projected semester
///        ├──► aggregate   column means, predicate counts, histogram buckets
///        ▼
///   ┌──────────┐
///   │ compose   │  StudentReport: immutable view-model, one Result per chart
///   └──────────┘
/// ```

pub mod aggregate;
pub mod compose;
pub mod normalize;
pub mod trend;
