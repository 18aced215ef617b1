// synthesize.rs — Deterministic text rendering for embedding input.
//
// Every embedded text is built here from one source record via a fixed
// template. Same record in, byte-identical sentence out: retrieval quality
// depends on re-runs producing vectors for exactly the same strings.

use crate::config;
use crate::error::PipelineResult;
use crate::loader::StudentRecord;

/// Render one student row into the fixed descriptive sentence fed to the
/// encoder. All eleven fields are required; a missing one fails the run.
pub fn student_sentence(record: &StudentRecord) -> PipelineResult<String> {
    let name = record.require("name")?;
    let gender = record.require("gender")?;
    let branch = record.require("branch")?;
    let roll_no = record.require("roll_no")?;
    let degree_name = record.require("degree_name")?;
    let joining_year = record.require("joining_year")?;
    let passed_year = record.require("passed_year")?;
    let credits = record.require("credits")?;
    let cgpa = record.require("cgpa")?;
    let admission = record.require("admission")?;
    let company_placed = record.require("company_placed")?;

    Ok(format!(
        "{name} is a {gender} student from the {branch} branch \
         with roll number {roll_no}. \
         They are pursuing a {degree_name} degree, \
         joined in {joining_year} and passed out in {passed_year}. \
         They earned {credits} credits with a CGPA of {cgpa}. \
         Admission type was {admission} and got placed in {company_placed}."
    ))
}

/// A chunk is worth embedding only when its trimmed text is longer than the
/// configured minimum. Shorter chunks are boilerplate fragments (nav labels,
/// cookie banners) that only pollute the collection.
pub fn chunk_text_is_valid(text: &str) -> bool {
    text.trim().chars().count() > config::validity::MIN_CHUNK_TEXT_CHARS
}

/// Placeholder sentence embedded in place of actual image content, derived
/// from the page the image was scraped from.
pub fn media_sentence(source_page: &str) -> String {
    format!("Image associated with informational content from the webpage {source_page}.")
}
