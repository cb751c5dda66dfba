//! Plain-text rendering for the terminal client

use std::fmt::Write;

use songbook_common::stats::percentage;
use songbook_common::{Song, StatsSummary};

/// Widest bar drawn by [`bar_chart`]
pub const BAR_WIDTH: usize = 40;

const NO_GENRE: &str = "(none)";

/// Upper-case the first letter of every space-separated word
pub fn capitalize_words(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numbered song table; `first_number` is the row number of `songs[0]`
pub fn song_table(songs: &[&Song], first_number: usize) -> String {
    if songs.is_empty() {
        return "No songs found.\n".to_string();
    }

    let title_width = column_width("Title", songs.iter().map(|s| s.title.as_str()));
    let artist_width = column_width("Artist", songs.iter().map(|s| s.artist.as_str()));
    let album_width = column_width("Album", songs.iter().map(|s| s.album.as_deref().unwrap_or("")));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<title_width$}  {:<artist_width$}  {:<album_width$}  {}",
        "#", "Title", "Artist", "Album", "Genre"
    );
    for (i, song) in songs.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<title_width$}  {:<artist_width$}  {:<album_width$}  {}",
            first_number + i,
            song.title,
            song.artist,
            song.album.as_deref().unwrap_or(""),
            song.genre.as_deref().unwrap_or(""),
        );
        let _ = writeln!(out, "      id: {}", song.id);
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

/// Horizontal bars scaled so the largest count spans [`BAR_WIDTH`]
pub fn bar_chart(rows: &[(String, u64, f64)]) -> String {
    let label_width = rows.iter().map(|(label, _, _)| label.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, count, _)| *count).max().unwrap_or(0);

    let mut out = String::new();
    for (label, count, pct) in rows {
        let len = if max == 0 {
            0
        } else {
            ((*count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
        };
        let _ = writeln!(
            out,
            "  {:<label_width$}  {:<BAR_WIDTH$}  {} ({:.1}%)",
            label,
            "#".repeat(len),
            count,
            pct
        );
    }
    out
}

/// Totals followed by genre, artist and album charts
pub fn stats_report(stats: &StatsSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total songs:   {}", stats.total_songs);
    let _ = writeln!(out, "Total artists: {}", stats.total_artists);
    let _ = writeln!(out, "Total albums:  {}", stats.total_albums);
    let _ = writeln!(out, "Total genres:  {}", stats.total_genres);

    if stats.total_songs == 0 {
        return out;
    }

    let genres: Vec<_> = stats
        .genre_stats
        .iter()
        .map(|g| {
            let label = g.genre.as_deref().map(capitalize_words).unwrap_or_else(|| NO_GENRE.to_string());
            (label, g.count, g.percentage)
        })
        .collect();
    let artists: Vec<_> = stats
        .artist_stats
        .iter()
        .map(|a| (capitalize_words(&a.artist), a.songs, a.percentage))
        .collect();
    // Album entries carry no percentage on the wire
    let albums: Vec<_> = stats
        .album_stats
        .iter()
        .map(|a| (capitalize_words(&a.album), a.songs, percentage(a.songs, stats.total_songs)))
        .collect();

    for (heading, rows) in [("Songs by genre", genres), ("Songs by artist", artists), ("Songs by album", albums)] {
        let _ = writeln!(out, "\n{}:", heading);
        out.push_str(&bar_chart(&rows));
    }
    out
}
