use crate::models::ReadingPosition;

/// Whether `candidate` is further along in mushaf order than `stored` and
/// should replace it as the last-read position.
///
/// Ordering is by surah index, then ayah. The juz index is ignored: a juz
/// view can show surahs that sit earlier in the book than something already
/// read in surah mode, and that must not pull the bookmark back. Revisiting
/// the same ayah is not progress.
pub fn is_more_advanced(candidate: &ReadingPosition, stored: Option<&ReadingPosition>) -> bool {
    let Some(stored) = stored else {
        return true;
    };

    let (cand_surah, stored_surah) = (candidate.surah_index(), stored.surah_index());
    if cand_surah != stored_surah {
        return cand_surah > stored_surah;
    }
    candidate.ayah() > stored.ayah()
}
