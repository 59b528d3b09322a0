use crate::error::{PdfSplitError, Result};
use crate::types::PageRange;

/// Splits `1..=total_pages` into `num_parts` contiguous ranges. The first
/// `total_pages % num_parts` parts get one page more than the rest.
pub fn calculate_parts(total_pages: usize, num_parts: usize) -> Result<Vec<PageRange>> {
    if num_parts < 1 {
        return Err(PdfSplitError::config(format!(
            "num_parts must be >= 1, got {}",
            num_parts
        )));
    }

    if num_parts > total_pages {
        return Err(PdfSplitError::config(format!(
            "num_parts ({}) cannot be greater than total_pages ({})",
            num_parts, total_pages
        )));
    }

    let pages_per_part = total_pages / num_parts;
    let remainder = total_pages % num_parts;

    let mut ranges = Vec::with_capacity(num_parts);
    let mut next_page = 1;

    for part in 0..num_parts {
        let size = pages_per_part + usize::from(part < remainder);
        let end = next_page + size - 1;
        ranges.push(PageRange::new(next_page, end));
        next_page = end + 1;
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(ranges: &[PageRange]) -> Vec<(usize, usize)> {
        ranges.iter().map(|r| (r.start(), r.end())).collect()
    }

    #[test]
    fn test_even_partition() {
        let parts = calculate_parts(100, 5).unwrap();
        assert_eq!(
            pairs(&parts),
            vec![(1, 20), (21, 40), (41, 60), (61, 80), (81, 100)]
        );
    }

    #[test]
    fn test_remainder_goes_to_first_parts() {
        // 102 = 5 * 20 + 2, so two parts of 21 then three of 20
        let parts = calculate_parts(102, 5).unwrap();
        assert_eq!(
            pairs(&parts),
            vec![(1, 21), (22, 42), (43, 62), (63, 82), (83, 102)]
        );

        assert_eq!(
            pairs(&calculate_parts(10, 3).unwrap()),
            vec![(1, 4), (5, 7), (8, 10)]
        );
    }

    #[test]
    fn test_single_part_and_one_page_parts() {
        assert_eq!(pairs(&calculate_parts(7, 1).unwrap()), vec![(1, 7)]);
        assert_eq!(
            pairs(&calculate_parts(3, 3).unwrap()),
            vec![(1, 1), (2, 2), (3, 3)]
        );
    }

    #[test]
    fn test_invalid_part_counts() {
        let err = calculate_parts(10, 0).unwrap_err();
        assert!(err.to_string().contains("num_parts must be >= 1"));

        let err = calculate_parts(3, 5).unwrap_err();
        assert!(err.to_string().contains("cannot be greater than total_pages"));

        assert!(calculate_parts(0, 1).is_err());
    }

    #[test]
    fn test_partition_covers_every_page_exactly_once() {
        for total in 1..=60 {
            for num_parts in 1..=total {
                let parts = calculate_parts(total, num_parts).unwrap();
                let floor = total / num_parts;

                assert_eq!(parts.len(), num_parts);
                assert_eq!(parts.iter().map(PageRange::len).sum::<usize>(), total);
                assert!(parts.iter().all(|r| r.len() == floor || r.len() == floor + 1));
                assert_eq!(parts.first().map(PageRange::start), Some(1));
                assert_eq!(parts.last().map(PageRange::end), Some(total));
                assert!(parts.windows(2).all(|w| w[1].start() == w[0].end() + 1));
            }
        }
    }
}
