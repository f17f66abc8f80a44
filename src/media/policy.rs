/// Compression policy for one image upload.
#[derive(Clone, Copy, Debug)]
pub struct ImagePolicy {
    /// Compression threshold; files at or under this size pass through
    /// untouched.
    pub max_size_kb: u32,
    /// Exact output dimensions (non-uniform resize).
    pub target_dimensions: Option<(u32, u32)>,
    /// Aspect-preserving bound, applied only when the image is wider.
    pub max_width: Option<u32>,
    /// Aspect-preserving bound, applied only when the image is taller.
    pub max_height: Option<u32>,
    pub quality_initial: u8,
}

pub const QUALITY_FLOOR: u8 = 50;
pub const MAX_QUALITY_ITERATIONS: u32 = 10;

impl ImagePolicy {
    pub fn exact(max_size_kb: u32, width: u32, height: u32) -> Self {
        Self {
            max_size_kb,
            target_dimensions: Some((width, height)),
            max_width: None,
            max_height: None,
            quality_initial: 85,
        }
    }

    pub fn bounded(max_size_kb: u32, max_width: Option<u32>, max_height: Option<u32>) -> Self {
        Self {
            max_size_kb,
            target_dimensions: None,
            max_width,
            max_height,
            quality_initial: 85,
        }
    }
}

/// Image-bearing fields across the site, each with its fixed policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaSlot {
    ProfilePicture,
    ClubLogo,
    ClubCover,
    FeatureCard,
    ClassRoutine,
}

impl MediaSlot {
    pub fn policy(self) -> ImagePolicy {
        match self {
            MediaSlot::ProfilePicture => ImagePolicy::exact(600, 600, 600),
            MediaSlot::ClubLogo => ImagePolicy::exact(500, 600, 600),
            MediaSlot::ClubCover => ImagePolicy::exact(1024, 2100, 600),
            MediaSlot::FeatureCard => ImagePolicy::bounded(800, Some(1200), Some(800)),
            MediaSlot::ClassRoutine => ImagePolicy::bounded(1024, Some(2000), None),
        }
    }

    /// Fixed output dimensions for slots that are cropped to a ratio.
    pub fn crop_target(self) -> Option<(u32, u32)> {
        self.policy().target_dimensions
    }
}

/// Document-bearing (PDF) fields, each with a hard size budget in MB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentSlot {
    FacultyCv,
    CourseOutline,
    AcademicCalendar,
    CurriculumPdf,
    AdmissionResult,
    PostAttachment,
}

impl DocumentSlot {
    pub fn max_size_mb(self) -> f64 {
        match self {
            DocumentSlot::FacultyCv => 10.0,
            DocumentSlot::CourseOutline => 10.0,
            DocumentSlot::AcademicCalendar => 10.0,
            DocumentSlot::CurriculumPdf => 20.0,
            DocumentSlot::AdmissionResult => 20.0,
            DocumentSlot::PostAttachment => 20.0,
        }
    }
}
