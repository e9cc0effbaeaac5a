//! Fuse adjacent automation steps that form one logical action.
//!
//! Single left-to-right pass with one step of lookahead. Steps are never
//! reordered; only pairs are fused:
//! - `open_app` + `open_url`: launch the app with the URL
//! - `open_app` naming a known folder + `open_file_path`: open the file inside
//!   that folder

use crate::actions::Allowlist;
use crate::control::{ActionKind, CombinationHint, Control};

pub fn combine(controls: Vec<Control>, allowlist: &Allowlist) -> Vec<Control> {
    let mut combined = Vec::with_capacity(controls.len());
    let mut steps = controls.into_iter().peekable();

    while let Some(current) = steps.next() {
        if current.action != Some(ActionKind::OpenApp) {
            combined.push(current);
            continue;
        }

        let next_action = steps.peek().and_then(|next| next.action);
        match next_action {
            Some(ActionKind::OpenUrl) => {
                if let Some(next) = steps.next() {
                    combined.push(fuse_app_url(current, next));
                }
            }
            Some(ActionKind::OpenFilePath) => {
                let folder_name = current.target.clone().unwrap_or_default();
                match allowlist.folder(&folder_name) {
                    Some(folder) => {
                        let folder = folder.to_path_buf();
                        if let Some(mut file) = steps.next() {
                            let file_name = file.target.clone().unwrap_or_default();
                            let full_path = folder.join(&file_name);
                            tracing::info!(
                                folder = %folder_name,
                                file = %file_name,
                                path = %full_path.display(),
                                "automation combine folder file"
                            );
                            file.target = Some(full_path.display().to_string());
                            file.hint = Some(CombinationHint::FolderFile {
                                folder_name,
                                file_name,
                            });
                            combined.push(file);
                        }
                    }
                    None => {
                        // Unknown folder: emit unmerged, the file step is
                        // examined again on the next iteration.
                        combined.push(current);
                    }
                }
            }
            _ => combined.push(current),
        }
    }

    combined
}

fn fuse_app_url(mut app: Control, url_step: Control) -> Control {
    let app_name = app.target.clone().unwrap_or_default();
    let url = url_step.target.unwrap_or_default();
    tracing::info!(app = %app_name, url = %url, "automation combine app url");

    app.target = Some(format!("{app_name} {url}"));
    app.hint = Some(CombinationHint::AppWithUrl { app_name, url });
    app
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::automation::parser;
    use crate::control::{Classifier, Mode};
    use crate::test_support::ScriptedGenerator;

    fn step(action: ActionKind, target: &str) -> Control {
        Control::action(format!("open {target}"), action, Some(target.into()))
    }

    fn downloads() -> Allowlist {
        Allowlist::empty().with_folder("downloads", "/home/u/Downloads")
    }

    #[tokio::test]
    async fn classify_then_combine_app_and_url() {
        let classifier = Classifier::new(Arc::new(ScriptedGenerator::new(&[])));
        let text = "Open Opera and open https://google.com";

        assert_eq!(classifier.classify(text).await.unwrap().mode, Mode::Automation);

        let mut controls = Vec::new();
        for step in parser::parse(text) {
            controls.push(classifier.classify(&step).await.unwrap());
        }
        let combined = combine(controls, &Allowlist::empty());

        assert_eq!(combined.len(), 1);
        let fused = &combined[0];
        assert_eq!(fused.action, Some(ActionKind::OpenApp));
        assert_eq!(fused.target.as_deref(), Some("Opera https://google.com"));
        assert_eq!(fused.url_param(), Some("https://google.com"));
        assert_eq!(fused.app_name(), Some("Opera"));
        assert_eq!(fused.mode, Mode::Action);
    }

    #[test]
    fn folder_and_file_fuse_into_file_path() {
        let combined = combine(
            vec![
                step(ActionKind::OpenApp, "Downloads"),
                step(ActionKind::OpenFilePath, "mama.pdf"),
            ],
            &downloads(),
        );

        assert_eq!(combined.len(), 1);
        let fused = &combined[0];
        assert_eq!(fused.action, Some(ActionKind::OpenFilePath));
        let expected = std::path::Path::new("/home/u/Downloads").join("mama.pdf");
        assert_eq!(fused.target.as_deref(), Some(expected.display().to_string().as_str()));
        assert_eq!(
            fused.hint,
            Some(CombinationHint::FolderFile {
                folder_name: "Downloads".into(),
                file_name: "mama.pdf".into(),
            })
        );
    }

    #[test]
    fn unknown_folder_leaves_steps_separate() {
        let combined = combine(
            vec![
                step(ActionKind::OpenApp, "Music"),
                step(ActionKind::OpenFilePath, "song.txt"),
            ],
            &downloads(),
        );
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].target.as_deref(), Some("Music"));
        assert_eq!(combined[0].hint, None);
        assert_eq!(combined[1].target.as_deref(), Some("song.txt"));
    }

    #[test]
    fn order_is_preserved_around_fused_pairs() {
        let combined = combine(
            vec![
                step(ActionKind::OpenUrl, "https://a.com"),
                step(ActionKind::OpenApp, "Chrome"),
                step(ActionKind::OpenUrl, "https://b.com"),
                step(ActionKind::OpenApp, "Spotify"),
            ],
            &downloads(),
        );
        let targets: Vec<_> = combined.iter().filter_map(|c| c.target.as_deref()).collect();
        assert_eq!(targets, vec!["https://a.com", "Chrome https://b.com", "Spotify"]);
    }

    #[test]
    fn app_followed_by_app_is_untouched() {
        let combined = combine(
            vec![step(ActionKind::OpenApp, "Chrome"), step(ActionKind::OpenApp, "Spotify")],
            &downloads(),
        );
        assert_eq!(combined.len(), 2);
        assert!(combined.iter().all(|c| c.hint.is_none()));
    }
}
