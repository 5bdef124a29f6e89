//! Tests for path resolution, redirects, classification and listings.

#[cfg(test)]
mod files_tests {
    use std::path::Path;
    use std::time::SystemTime;

    use percent_encoding::percent_decode_str;
    use tempfile::TempDir;

    use crate::files::classify::extension;
    use crate::files::listing::is_hidden;
    use crate::files::redirect::check;
    use crate::files::{
        clean_path, content_type, entry_category, file_category, format_modified, format_size,
        html_escape, normalize, open, resolve_path, url_escape, Category, Decision, Error,
        LinkTarget, Listing, ListingEntry, Opened,
    };

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("report.pdf"), vec![b'x'; 1536]).unwrap();
        std::fs::write(dir.path().join(".secret"), b"hidden").unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        dir
    }

    #[test]
    fn test_format_size_examples() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
        assert_eq!(format_size(1099511627776), "1.00 TB");
    }

    #[test]
    fn test_format_size_stops_at_terabytes() {
        assert_eq!(format_size(1024 * 1099511627776), "1024.00 TB");
        assert!(format_size(u64::MAX).ends_with(" TB"));
    }

    #[test]
    fn test_format_size_always_has_two_decimals() {
        for size in [1, 7, 999, 1025, 123_456, 9_999_999, 5_000_000_000] {
            let label = format_size(size);
            let number = label.split(' ').next().unwrap();
            let (_, decimals) = number.split_once('.').unwrap();
            assert_eq!(decimals.len(), 2, "{label}");
        }
    }

    #[test]
    fn test_format_size_is_monotonic_within_a_unit() {
        let mut previous = 0.0;
        for size in (1024..1024 * 1024).step_by(4099) {
            let label = format_size(size);
            assert!(label.ends_with(" KB"), "{label}");
            let value: f64 = label.trim_end_matches(" KB").parse().unwrap();
            assert!(value >= previous, "{label} after {previous}");
            previous = value;
        }
    }

    #[test]
    fn test_url_escape_leaves_unreserved_alone() {
        let name = "Report_2024-v1.final~";
        assert!(matches!(url_escape(name), std::borrow::Cow::Borrowed(_)));
        assert_eq!(url_escape(name), name);
        assert_eq!(url_escape(&url_escape(name)), name);
    }

    #[test]
    fn test_url_escape_reserved_characters() {
        assert_eq!(url_escape("a b"), "a%20b");
        assert_eq!(url_escape("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(url_escape("$&+,:;=@"), "%24%26%2B%2C%3A%3B%3D%40");
        assert_eq!(url_escape("\"><script>"), "%22%3E%3Cscript%3E");
        assert_eq!(url_escape("caf\u{e9}"), "caf%C3%A9");
        assert_eq!(url_escape("100%"), "100%25");
    }

    #[test]
    fn test_url_escape_output_is_safe_and_decodes_back() {
        let names = [
            "plain.txt",
            "with space.mp3",
            "quote\"d'.txt",
            "<img src=x onerror=alert(1)>.png",
            "percent%41.txt",
            "\u{65e5}\u{672c}\u{8a9e}.doc",
            "emoji \u{1f600}.gif",
            "tab\there",
            "a&b=c;d",
        ];

        for name in names {
            let escaped = url_escape(name);
            let bytes = escaped.as_bytes();
            let mut i = 0;
            while i < bytes.len() {
                if bytes[i] == b'%' {
                    let hex = &escaped[i + 1..i + 3];
                    assert!(
                        hex.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)),
                        "{escaped}"
                    );
                    i += 3;
                } else {
                    assert!(
                        bytes[i].is_ascii_alphanumeric() || b"-_.~".contains(&bytes[i]),
                        "{escaped}"
                    );
                    i += 1;
                }
            }

            let decoded: Vec<u8> = percent_decode_str(&escaped).collect();
            assert_eq!(decoded, name.as_bytes());
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("plain"), "plain");
        assert_eq!(
            html_escape("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&#34;x&#34;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_format_modified_layout() {
        let label = format_modified(SystemTime::UNIX_EPOCH);
        let fields: Vec<&str> = label.split_whitespace().collect();
        assert_eq!(fields.len(), 5, "{label}");
        assert_eq!(fields[0].len(), 3);
        assert_eq!(fields[1].len(), 3);
        assert_eq!(fields[3].matches(':').count(), 2);
        assert!(fields[4] == "1969" || fields[4] == "1970");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("report.pdf"), ".pdf");
        assert_eq!(extension("archive.tar.gz"), ".gz");
        assert_eq!(extension("Makefile"), "");
        assert_eq!(extension(".bashrc"), ".bashrc");
    }

    #[test]
    fn test_file_categories() {
        assert_eq!(file_category("photo.JPG"), Category::Image);
        assert_eq!(file_category("song.mp3"), Category::Audio);
        assert_eq!(file_category("movie.MkV"), Category::Video);
        assert_eq!(file_category("notes.text"), Category::Document);
        assert_eq!(file_category("index.htm"), Category::Web);
        assert_eq!(file_category("main.go"), Category::Develop);
        assert_eq!(file_category("data.bin"), Category::File);
        assert_eq!(file_category("README"), Category::File);
    }

    #[test]
    fn test_directories_are_always_directory_category() {
        assert_eq!(entry_category("images.png", true), Category::Directory);
        assert_eq!(entry_category("images.png", false), Category::Image);
        assert_eq!(Category::Directory.to_string(), "directory");
    }

    #[test]
    fn test_content_type_lookup() {
        assert_eq!(content_type("report.pdf"), Some("application/pdf"));
        assert_eq!(content_type("index.html"), Some("text/html"));
        assert_eq!(content_type("photo.png"), Some("image/png"));
        assert_eq!(content_type("blob.zzqx"), None);
        assert_eq!(content_type("Makefile"), None);
    }

    #[test]
    fn test_normalize_prepends_separator() {
        assert_eq!(normalize("docs/"), "/docs/");
        assert_eq!(normalize("/docs/"), "/docs/");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("/docs/"), "/docs");
        assert_eq!(clean_path("//docs///a//"), "/docs/a");
        assert_eq!(clean_path("/docs/./a/../b"), "/docs/b");
        assert_eq!(clean_path("/../../etc/passwd"), "/etc/passwd");
        assert_eq!(clean_path("/a/b/../../../.."), "/");
        assert_eq!(clean_path("/.../x"), "/.../x");
    }

    #[test]
    fn test_traversal_attempts_stay_inside_root() {
        let root = Path::new("/srv/share");
        let parts = ["..", ".", "", "a", "..a", "...", "b.."];

        let mut checked = 0;
        for first in parts {
            for second in parts {
                for third in parts {
                    for fourth in ["..", "etc", "passwd", ""] {
                        let request = format!("/{first}/{second}/{third}/{fourth}");
                        let resolved = resolve_path(root, &request);
                        assert!(resolved.starts_with(root), "{request} -> {}", resolved.display());
                        assert!(
                            resolved.components().all(|c| c != std::path::Component::ParentDir),
                            "{request} -> {}",
                            resolved.display()
                        );

                        // Removing the root leaves exactly the cleaned request path.
                        let relative = resolved.strip_prefix(root).unwrap();
                        let cleaned = clean_path(&request);
                        assert_eq!(
                            Path::new("/").join(relative),
                            Path::new(&cleaned),
                            "{request}"
                        );
                        checked += 1;
                    }
                }
            }
        }
        assert_eq!(checked, 7 * 7 * 7 * 4);
    }

    #[test]
    fn test_redirect_directory_without_slash() {
        assert_eq!(check("/docs", None, true), Decision::Redirect("docs/".to_string()));
        assert_eq!(
            check("/a/b/docs", Some("sort=name"), true),
            Decision::Redirect("docs/?sort=name".to_string())
        );
        assert_eq!(
            check("/my docs", None, true),
            Decision::Redirect("my%20docs/".to_string())
        );
    }

    #[test]
    fn test_redirect_file_with_slash() {
        assert_eq!(
            check("/report.pdf/", None, false),
            Decision::Redirect("../report.pdf".to_string())
        );
        assert_eq!(
            check("/a/report.pdf//", Some("x=1"), false),
            Decision::Redirect("../report.pdf?x=1".to_string())
        );
    }

    #[test]
    fn test_no_redirect_when_kind_matches() {
        assert_eq!(check("/", None, true), Decision::Serve);
        assert_eq!(check("/docs/", Some("q"), true), Decision::Serve);
        assert_eq!(check("/report.pdf", None, false), Decision::Serve);
    }

    #[tokio::test]
    async fn test_open_file() {
        let dir = fixture();
        let target = open(dir.path(), "/report.pdf").await.unwrap();
        assert!(!target.is_dir);
        assert_eq!(target.size, 1536);
        assert_eq!(target.name, "report.pdf");
        assert_eq!(target.canonical_path, "/report.pdf");
        assert!(matches!(target.handle, Opened::File(_)));
    }

    #[tokio::test]
    async fn test_open_directory() {
        let dir = fixture();
        let target = open(dir.path(), "docs").await.unwrap();
        assert!(target.is_dir);
        assert_eq!(target.name, "docs");
        assert_eq!(target.canonical_path, "/docs");
        assert!(target.fs_path.starts_with(dir.path()));
        assert!(matches!(target.handle, Opened::Directory(_)));
    }

    #[tokio::test]
    async fn test_open_missing_is_not_found() {
        let dir = fixture();
        let result = open(dir.path(), "/nope.txt").await;
        assert!(matches!(result, Err(Error::NotFound { ref path, .. }) if path == "/nope.txt"));

        // A file used as a directory is also just missing.
        let result = open(dir.path(), "/report.pdf/inner").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_open_traversal_is_confined() {
        let dir = fixture();
        let nested = dir.path().join("docs");
        std::fs::write(dir.path().join("outside.txt"), b"nope").unwrap();

        let result = open(&nested, "/../outside.txt").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        let target = open(&nested, "/../../..").await.unwrap();
        assert_eq!(target.fs_path, nested);
        assert!(target.is_dir);
    }

    #[test]
    fn test_listing_entry_for_directory_and_file() {
        let now = SystemTime::now();

        let docs = ListingEntry::new("docs", true, 4096, now);
        assert_eq!(docs.category, Category::Directory);
        assert_eq!(docs.size_label, "-");
        assert_eq!(docs.link_target, LinkTarget::SameWindow);

        let report = ListingEntry::new("my report.pdf", false, 1536, now);
        assert_eq!(report.category, Category::Document);
        assert_eq!(report.size_label, "1.50 KB");
        assert_eq!(report.url_path, "my%20report.pdf");
        assert_eq!(report.link_target, LinkTarget::NewWindow);
    }

    #[test]
    fn test_hidden_names() {
        assert!(is_hidden(".git"));
        assert!(is_hidden("."));
        assert!(!is_hidden("a.hidden"));
    }

    #[tokio::test]
    async fn test_listing_groups_and_hides() {
        let dir = fixture();
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let listing = Listing::read("share", &mut entries).await;

        assert_eq!(listing.directories.len(), 1);
        assert_eq!(listing.directories[0].name, "docs");
        assert_eq!(listing.directories[0].size_label, "-");
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].name, "report.pdf");
        assert_eq!(listing.files[0].size_label, "1.50 KB");

        let html = listing.to_string();
        let docs_at = html.find(">docs</a>").unwrap();
        let report_at = html.find(">report.pdf</a>").unwrap();
        assert!(docs_at < report_at);
        assert!(!html.contains(".secret"));
        assert!(!html.contains(".git"));
        assert!(html.contains("<title>share</title>"));
        assert!(html.contains("href=\"docs\" target=\"_self\""));
        assert!(html.contains("href=\"report.pdf\" target=\"_blank\""));
        assert!(html.contains("class=\"document icon\""));
    }

    #[tokio::test]
    async fn test_listing_reads_past_one_batch() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..250 {
            std::fs::write(dir.path().join(format!("file{i:03}.txt")), b"").unwrap();
        }
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let listing = Listing::read("many", &mut entries).await;
        assert_eq!(listing.len(), 250);
        assert!(listing.directories.is_empty());
    }

    #[test]
    fn test_listing_keeps_insertion_order_directories_first() {
        let now = SystemTime::now();
        let mut listing = Listing::new("mixed");
        listing.push(ListingEntry::new("zeta.txt", false, 1, now));
        listing.push(ListingEntry::new("beta", true, 0, now));
        listing.push(ListingEntry::new("alpha.txt", false, 1, now));
        listing.push(ListingEntry::new("alpha", true, 0, now));

        let html = listing.to_string();
        let positions: Vec<usize> = [">beta</a>", ">alpha</a>", ">zeta.txt</a>", ">alpha.txt</a>"]
            .iter()
            .map(|needle| html.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_listing_escapes_hostile_names() {
        let mut listing = Listing::new("<b>x</b>");
        listing.push(ListingEntry::new(
            "\"><script>alert(1)</script>.html",
            false,
            10,
            SystemTime::now(),
        ));

        let html = listing.to_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("<title>&lt;b&gt;x&lt;/b&gt;</title>"));
        assert!(html.contains("href=\"%22%3E%3Cscript%3Ealert%281%29%3C%2Fscript%3E.html\""));
        assert!(html.contains("&#34;&gt;&lt;script&gt;alert(1)&lt;/script&gt;.html</a>"));
    }

    #[test]
    fn test_listing_document_frame() {
        let html = Listing::new("empty").to_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("href=\"/\""));
        assert!(html.contains("href=\"../\""));
        assert!(html.contains(&format!("Served using Commodo v{}", crate::VERSION)));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
