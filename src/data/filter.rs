use super::model::{Cohort, StudentRecord};

// ---------------------------------------------------------------------------
// Search predicate: free-text match on name, id or class
// ---------------------------------------------------------------------------

/// Whether `record` matches a lower-cased, trimmed search term.
fn matches(record: &StudentRecord, needle: &str) -> bool {
    [&record.name, &record.student_id, &record.class_name]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Return indices of records that match the search term.
///
/// * An empty (or all-whitespace) term → every record
/// * Otherwise → case-insensitive substring match on name, student id or class
pub fn filtered_indices(cohort: &Cohort, term: &str) -> Vec<usize> {
    let needle = term.trim().to_lowercase();
    cohort
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| needle.is_empty() || matches(record, &needle))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, RawTable};
    use pretty_assertions::assert_eq;

    fn student(name: &str, id: &str, class: &str) -> Vec<CellValue> {
        [name, id, class]
            .into_iter()
            .map(|s| CellValue::Text(s.to_string()))
            .collect()
    }

    fn cohort() -> Cohort {
        let headers = vec!["姓名".into(), "学号".into(), "班级_基本信息".into()];
        Cohort::from_table(RawTable::new(
            headers,
            vec![
                student("张三", "S001", "计科2101"),
                student("李四", "S002", "计科2102"),
                student("Alice", "S103", "软工2101"),
                student("王五", "007", "计科2101"),
            ],
        ))
    }

    #[test]
    fn empty_term_keeps_everything() {
        assert_eq!(filtered_indices(&cohort(), "  "), vec![0, 1, 2, 3]);
    }

    #[test]
    fn matches_name_id_or_class() {
        let c = cohort();
        assert_eq!(filtered_indices(&c, "李"), vec![1]);
        assert_eq!(filtered_indices(&c, "s10"), vec![2]);
        assert_eq!(filtered_indices(&c, "2101"), vec![0, 2, 3]);
        assert_eq!(filtered_indices(&c, "007"), vec![3]);
        assert_eq!(filtered_indices(&c, "alice"), vec![2]);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(filtered_indices(&cohort(), "赵六").is_empty());
    }
}
