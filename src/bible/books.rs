/// Dutch (NBV21) book names mapped to USFM book codes.
static BOOK_CODES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "Genesis" => "GEN",
    "Exodus" => "EXO",
    "Leviticus" => "LEV",
    "Numeri" => "NUM",
    "Deuteronomium" => "DEU",
    "Jozua" => "JOS",
    "Rechters" => "JDG",
    "Ruth" => "RUT",
    "1 Samuel" => "1SA",
    "2 Samuel" => "2SA",
    "1 Koningen" => "1KI",
    "2 Koningen" => "2KI",
    "1 Kronieken" => "1CH",
    "2 Kronieken" => "2CH",
    "Ezra" => "EZR",
    "Nehemia" => "NEH",
    "Ester" => "EST",
    "Job" => "JOB",
    "Psalmen" => "PSA",
    "Spreuken" => "PRO",
    "Prediker" => "ECC",
    "Hooglied" => "SNG",
    "Jesaja" => "ISA",
    "Jeremia" => "JER",
    "Klaagliederen" => "LAM",
    "Ezechiël" => "EZK",
    "Daniël" => "DAN",
    "Hosea" => "HOS",
    "Joël" => "JOL",
    "Amos" => "AMO",
    "Obadja" => "OBA",
    "Jona" => "JON",
    "Micha" => "MIC",
    "Nahum" => "NAM",
    "Habakuk" => "HAB",
    "Sefanja" => "ZEP",
    "Haggai" => "HAG",
    "Zacharia" => "ZEC",
    "Maleachi" => "MAL",
    "Matteüs" => "MAT",
    "Marcus" => "MRK",
    "Lucas" => "LUK",
    "Johannes" => "JHN",
    "Handelingen" => "ACT",
    "Romeinen" => "ROM",
    "1 Korintiërs" => "1CO",
    "2 Korintiërs" => "2CO",
    "Galaten" => "GAL",
    "Efeziërs" => "EPH",
    "Filippenzen" => "PHP",
    "Kolossenzen" => "COL",
    "1 Tessalonicenzen" => "1TH",
    "2 Tessalonicenzen" => "2TH",
    "1 Timoteüs" => "1TI",
    "2 Timoteüs" => "2TI",
    "Titus" => "TIT",
    "Filemon" => "PHM",
    "Hebreeën" => "HEB",
    "Jakobus" => "JAS",
    "1 Petrus" => "1PE",
    "2 Petrus" => "2PE",
    "1 Johannes" => "1JN",
    "2 Johannes" => "2JN",
    "3 Johannes" => "3JN",
    "Judas" => "JUD",
    "Openbaring" => "REV",
};

/// Look up the USFM code of a book by its Dutch name.
#[inline]
pub fn book_code(name: &str) -> Option<&'static str> {
    BOOK_CODES.get(name.trim()).copied()
}

/// All known book names (unordered).
pub fn book_names() -> impl Iterator<Item = &'static str> {
    BOOK_CODES.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_books_present() {
        assert_eq!(book_names().count(), 66);
    }

    #[test]
    fn test_lookup_trims() {
        assert_eq!(book_code(" Johannes "), Some("JHN"));
        assert_eq!(book_code("1 Korintiërs"), Some("1CO"));
        assert_eq!(book_code("Henoch"), None);
    }
}
