//! Match library files that lack model metadata to tags pointing at them.

use tafsync_core::{FileRecord, TagRecord};

/// Attach tag metadata to files that have none.
///
/// A file without `tonieInfo` (and with a non-empty name) takes the
/// `tonieInfo` of the first tag whose `source` ends with the file name and
/// which carries `tonieInfo` itself. Only files that gained metadata are
/// returned; files that already had it are dropped.
pub fn attach_tag_info(files: Vec<FileRecord>, tags: &[TagRecord]) -> Vec<FileRecord> {
    files
        .into_iter()
        .filter(|file| file.tonie_info.is_none() && !file.name.is_empty())
        .filter_map(|mut file| {
            let info = tags
                .iter()
                .filter(|tag| tag.source.ends_with(&file.name))
                .find_map(|tag| tag.tonie_info.clone())?;
            tracing::debug!(file = %file.name, model = ?info.model, "matched tag");
            file.tonie_info = Some(info);
            Some(file)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tafsync_core::TonieInfo;

    fn file(name: &str) -> FileRecord {
        FileRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    fn tag(source: &str, model: Option<&str>) -> TagRecord {
        TagRecord {
            source: source.into(),
            uid: None,
            tonie_info: model.map(|m| TonieInfo {
                model: Some(m.into()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn file_gains_info_from_matching_tag() {
        let out = attach_tag_info(
            vec![file("alpha.taf")],
            &[tag("lib://by/audioID/1/alpha.taf", Some("10000001"))],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].model(), Some("10000001"));
    }

    #[test]
    fn tag_without_info_is_passed_over() {
        let out = attach_tag_info(
            vec![file("alpha.taf")],
            &[
                tag("lib://a/alpha.taf", None),
                tag("lib://b/alpha.taf", Some("10000002")),
            ],
        );
        assert_eq!(out[0].model(), Some("10000002"));
    }

    #[test]
    fn no_matching_tag_means_no_output() {
        let out = attach_tag_info(
            vec![file("alpha.taf")],
            &[
                tag("lib://a/beta.taf", Some("1")),
                tag("lib://a/alpha.taf", None),
            ],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn files_with_info_are_not_rematched() {
        let mut known = file("alpha.taf");
        known.tonie_info = Some(TonieInfo {
            model: Some("old".into()),
            ..Default::default()
        });
        let out = attach_tag_info(vec![known], &[tag("x/alpha.taf", Some("new"))]);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_name_never_matches() {
        let out = attach_tag_info(vec![file("")], &[tag("x/alpha.taf", Some("1"))]);
        assert!(out.is_empty());
    }

    #[test]
    fn match_is_a_suffix_match() {
        let out = attach_tag_info(
            vec![file("alpha.taf"), file("lpha.taf")],
            &[tag("lib://a/alpha.taf.bak", Some("1")), tag("lib://a/alpha.taf", Some("2"))],
        );
        // "lpha.taf" is a suffix of ".../alpha.taf" too.
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].model(), Some("2"));
        assert_eq!(out[1].model(), Some("2"));
    }
}
