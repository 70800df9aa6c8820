mod support;

use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

use support::{sample_status, Behavior, StubInspector};
use vcsstatus_core::inspect::InspectError;
use vcsstatus_core::palette::Palette;
use vcsstatus_core::resolve::Resolver;
use vcsstatus_core::types::{VcsKind, VcsPreference};

const DIR: &str = "/work/project";

fn resolver(git: &StubInspector, hg: &StubInspector) -> Resolver<StubInspector, StubInspector> {
    Resolver::new(git.clone(), hg.clone(), Duration::from_secs(5))
}

#[tokio::test]
async fn detect_prefers_git() {
    let git = StubInspector::new(VcsKind::Git, Behavior::Found);
    let hg = StubInspector::new(VcsKind::Mercurial, Behavior::Forbidden);

    let resolution = resolver(&git, &hg)
        .resolve(Path::new(DIR), VcsPreference::Detect, Palette::new(false))
        .await;

    let status = resolution.status.expect("git status");
    assert_eq!(status.vcs.plain, "git");
    assert_eq!(hg.calls().load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn detect_falls_back_to_mercurial() {
    let git = StubInspector::new(VcsKind::Git, Behavior::NotThisVcs);
    let hg = StubInspector::new(VcsKind::Mercurial, Behavior::Found);

    let resolution = resolver(&git, &hg)
        .resolve(Path::new(DIR), VcsPreference::Detect, Palette::new(false))
        .await;

    let expected = sample_status(VcsKind::Mercurial, Path::new(DIR), Palette::new(false));
    assert_eq!(resolution.status, Some(expected));
    assert!(resolution.errors.is_empty());
    assert_eq!(git.calls().load(Ordering::SeqCst), 1);
    assert_eq!(hg.calls().load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn detect_keeps_git_failure_visible_after_fallback() {
    let git = StubInspector::new(VcsKind::Git, Behavior::Fail);
    let hg = StubInspector::new(VcsKind::Mercurial, Behavior::Found);

    let resolution = resolver(&git, &hg)
        .resolve(Path::new(DIR), VcsPreference::Detect, Palette::new(false))
        .await;

    assert!(resolution.status.is_some());
    assert_eq!(resolution.errors.len(), 1);
    assert!(matches!(resolution.errors[0], InspectError::CommandFailed { .. }));
}

#[tokio::test]
async fn detect_without_any_repository_is_absent() {
    let git = StubInspector::new(VcsKind::Git, Behavior::NotThisVcs);
    let hg = StubInspector::new(VcsKind::Mercurial, Behavior::NotThisVcs);

    let resolution = resolver(&git, &hg)
        .resolve(Path::new(DIR), VcsPreference::Detect, Palette::new(false))
        .await;

    assert!(resolution.status.is_none());
    assert!(resolution.errors.is_empty());
}

#[tokio::test]
async fn detect_with_failures_everywhere_reports_both() {
    let git = StubInspector::new(VcsKind::Git, Behavior::Fail);
    let hg = StubInspector::new(VcsKind::Mercurial, Behavior::Fail);

    let resolution = resolver(&git, &hg)
        .resolve(Path::new(DIR), VcsPreference::Detect, Palette::new(false))
        .await;

    assert!(resolution.status.is_none());
    assert_eq!(resolution.errors.len(), 2);
}

#[tokio::test]
async fn explicit_git_does_not_fall_back() {
    let git = StubInspector::new(VcsKind::Git, Behavior::NotThisVcs);
    let hg = StubInspector::new(VcsKind::Mercurial, Behavior::Forbidden);

    let resolution = resolver(&git, &hg)
        .resolve(Path::new(DIR), VcsPreference::Git, Palette::new(false))
        .await;

    let status = resolution.status.expect("not-a-repository status");
    assert!(!status.is_repo);
    assert_eq!(status.vcs.plain, "git");
    assert_eq!(hg.calls().load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn explicit_mercurial_failure_is_absent() {
    let git = StubInspector::new(VcsKind::Git, Behavior::Forbidden);
    let hg = StubInspector::new(VcsKind::Mercurial, Behavior::Fail);

    let resolution = resolver(&git, &hg)
        .resolve(Path::new(DIR), VcsPreference::Mercurial, Palette::new(false))
        .await;

    assert!(resolution.status.is_none());
    assert_eq!(resolution.errors.len(), 1);
    assert_eq!(git.calls().load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn slow_inspector_times_out() {
    let git = StubInspector::new(VcsKind::Git, Behavior::Found).with_delay(Duration::from_secs(10));
    let hg = StubInspector::new(VcsKind::Mercurial, Behavior::Forbidden);
    let resolver = Resolver::new(git, hg, Duration::from_millis(50));

    let resolution = resolver
        .resolve(Path::new(DIR), VcsPreference::Git, Palette::new(false))
        .await;

    assert!(resolution.status.is_none());
    assert!(matches!(
        resolution.errors[0],
        InspectError::Timeout {
            vcs: VcsKind::Git,
            ..
        }
    ));
}
