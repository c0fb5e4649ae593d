/// Splits display lines into pages of at most `lines_per_page` lines.
///
/// The last page may be partial. An empty line sequence still yields one
/// empty page so every document has at least one page object.
pub fn paginate<I>(lines: I, lines_per_page: usize) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let lines_per_page = lines_per_page.max(1);
    let mut pages = Vec::new();
    let mut current = Vec::with_capacity(lines_per_page);

    for line in lines {
        current.push(line);
        if current.len() == lines_per_page {
            pages.push(std::mem::replace(
                &mut current,
                Vec::with_capacity(lines_per_page),
            ));
        }
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Number of pages [`paginate`] produces for `line_count` lines.
pub fn page_count(line_count: usize, lines_per_page: usize) -> usize {
    line_count.div_ceil(lines_per_page.max(1)).max(1)
}
