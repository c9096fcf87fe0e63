//! Profile page: view and edit name, email, password and avatar

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use super::{handle_failure, Notice, Page, Route, LOADING};
use crate::client::{ClientResult, ClinicApi, ImageUpload, ProfileUpdate, Session};
use crate::models::User;

pub const PROFILE_UPDATED: &str = "Profile updated!";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile.";

/// Editable fields, seeded from the loaded account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    /// Left empty to keep the current password
    pub password: String,
}

pub struct ProfilePage {
    session: Session,
    profile: Option<User>,
    pub form: ProfileForm,
    editing: bool,
    image: Option<ImageUpload>,
    preview: String,
    saved_preview: String,
    redirect: Option<Route>,
}

impl ProfilePage {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            profile: None,
            form: ProfileForm::default(),
            editing: false,
            image: None,
            preview: String::new(),
            saved_preview: String::new(),
            redirect: None,
        }
    }

    pub fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// URL currently shown as the avatar: the stored image, a local
    /// `data:` preview, or the placeholder
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn selected_image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    /// Leave edit mode, dropping any picked image and its preview
    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.image = None;
        self.preview = self.saved_preview.clone();
    }

    /// Read a local image and preview it as a `data:` URL. No network access.
    pub fn select_image(&mut self, path: &Path) -> ClientResult<()> {
        let bytes = std::fs::read(path)?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        self.preview = format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes));
        self.image = Some(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
        Ok(())
    }

    /// Send the form as multipart. The password goes only when non-empty and
    /// the image only when one was picked.
    pub async fn save(&mut self, api: &dyn ClinicApi) -> Notice {
        let update = ProfileUpdate {
            name: self.form.name.clone(),
            email: self.form.email.clone(),
            password: self.form.password.clone(),
            image: self.image.clone(),
        };

        match api.update_profile(&update).await {
            Ok(updated) => {
                tracing::info!(user_id = updated.id, "Profile saved");
                if let Some(profile) = self.profile.as_mut() {
                    profile.name = updated.name;
                    profile.email = updated.email;
                    profile.profile_image = updated.profile_image;
                }
                self.saved_preview = api.image_url(
                    self.profile
                        .as_ref()
                        .and_then(|p| p.profile_image.as_deref()),
                );
                self.preview = self.saved_preview.clone();
                self.image = None;
                self.form.password.clear();
                self.editing = false;
                Notice::Success(PROFILE_UPDATED.to_string())
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Profile update failed");
                Notice::Error(PROFILE_UPDATE_FAILED.to_string())
            }
        }
    }
}

#[async_trait]
impl Page for ProfilePage {
    async fn mount(&mut self, api: &dyn ClinicApi) {
        self.image = None;
        self.editing = false;

        match api.me().await {
            Ok(user) => {
                self.form = ProfileForm {
                    name: user.name.clone(),
                    email: user.email.clone(),
                    password: String::new(),
                };
                self.saved_preview = api.image_url(user.profile_image.as_deref());
                self.preview = self.saved_preview.clone();
                self.profile = Some(user);
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Error loading profile");
            }
        }
    }

    fn render(&self) -> String {
        let Some(profile) = &self.profile else {
            return format!("{}\n", LOADING);
        };

        let mut out = String::from("My Profile\n\n");
        out.push_str(&format!("Avatar: {}\n", shorten(&self.preview, 72)));

        if self.editing {
            out.push_str(&format!("Name: {}\n", self.form.name));
            out.push_str(&format!("Email: {}\n", self.form.email));
            out.push_str(&format!(
                "New Password: {}\n",
                if self.form.password.is_empty() {
                    "(unchanged)"
                } else {
                    "********"
                }
            ));
            if let Some(image) = &self.image {
                out.push_str(&format!("Image: {}\n", image.file_name));
            }
            out.push_str("[Save Changes]  [Cancel]\n");
        } else {
            let role = match self.session.role() {
                Ok(Some(role)) => role.as_str().to_string(),
                _ => "-".to_string(),
            };
            out.push_str(&format!("Name: {}\n", profile.name));
            out.push_str(&format!("Email: {}\n", profile.email));
            out.push_str(&format!("Role: {}\n", role));
            out.push_str(&format!(
                "Joined on {}\n",
                profile.created_at.format("%Y-%m-%d")
            ));
            out.push_str("[Update Profile]\n");
        }
        out
    }

    fn redirect(&self) -> Option<Route> {
        self.redirect
    }
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PLACEHOLDER_AVATAR;
    use crate::models::Role;
    use crate::views::fake::{FakeApi, BASE_URL};
    use tempfile::tempdir;

    async fn mounted(api: &FakeApi) -> (ProfilePage, User) {
        let user = api.add_user("Asha", Role::Patient);
        api.sign_in(&user);
        let mut page = ProfilePage::new(api.session());
        assert_eq!(page.render(), "Loading...\n");
        page.mount(api).await;
        (page, user)
    }

    #[tokio::test]
    async fn test_mount_fills_form() {
        let api = FakeApi::new();
        let (page, user) = mounted(&api).await;

        assert_eq!(page.profile().unwrap().id, user.id);
        assert_eq!(page.form.name, "Asha");
        assert_eq!(page.form.email, "asha@clinic.test");
        assert_eq!(page.preview(), PLACEHOLDER_AVATAR);

        let out = page.render();
        assert!(out.contains("Name: Asha"));
        assert!(out.contains("Role: patient"));
    }

    #[tokio::test]
    async fn test_select_image_previews_locally() {
        let api = FakeApi::new();
        let (mut page, _) = mounted(&api).await;
        let calls_before = api.calls().len();

        let dir = tempdir().unwrap();
        let path = dir.path().join("me.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        page.start_editing();
        page.select_image(&path).unwrap();
        assert_eq!(page.preview(), "data:image/png;base64,AQID");
        assert_eq!(page.selected_image().unwrap().file_name, "me.png");
        assert_eq!(api.calls().len(), calls_before);

        page.cancel_editing();
        assert!(page.selected_image().is_none());
        assert_eq!(page.preview(), PLACEHOLDER_AVATAR);
    }

    #[tokio::test]
    async fn test_save_uploads_and_refreshes_avatar() {
        let api = FakeApi::new();
        let (mut page, user) = mounted(&api).await;

        let dir = tempdir().unwrap();
        let path = dir.path().join("me.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        page.start_editing();
        page.form.name = "Asha Rao".to_string();
        page.form.password = "new-secret".to_string();
        page.select_image(&path).unwrap();
        assert_eq!(page.selected_image().unwrap().content_type, "image/jpeg");

        let notice = page.save(&api).await;
        assert_eq!(notice, Notice::Success(PROFILE_UPDATED.to_string()));
        assert!(!page.is_editing());
        assert!(page.form.password.is_empty());
        assert_eq!(page.profile().unwrap().name, "Asha Rao");
        assert_eq!(
            page.preview(),
            format!("{}/auth/profile-image/{}", BASE_URL, user.id)
        );
    }

    #[tokio::test]
    async fn test_save_failure_keeps_state() {
        let api = FakeApi::new();
        let (mut page, _) = mounted(&api).await;
        api.fail("update_profile");

        page.start_editing();
        page.form.name = "Changed".to_string();
        let notice = page.save(&api).await;
        assert_eq!(notice.text(), PROFILE_UPDATE_FAILED);
        assert!(page.is_editing());
        assert_eq!(page.profile().unwrap().name, "Asha");
    }

    #[test]
    fn test_select_missing_file() {
        let mut page = ProfilePage::new(Session::in_memory());
        assert!(page.select_image(Path::new("/definitely/not/here.png")).is_err());
        assert!(page.selected_image().is_none());
    }
}
