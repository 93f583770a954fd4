use nalgebra::Vector3;

/// Azure Kinect Body Tracking の 32 関節インデックス
///
/// CSV の列順はこの列挙の宣言順から一度だけ導出され、ストリーム途中で
/// 変わることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointId {
    Pelvis = 0,
    SpineNavel = 1,
    SpineChest = 2,
    Neck = 3,
    ClavicleLeft = 4,
    ShoulderLeft = 5,
    ElbowLeft = 6,
    WristLeft = 7,
    HandLeft = 8,
    HandtipLeft = 9,
    ThumbLeft = 10,
    ClavicleRight = 11,
    ShoulderRight = 12,
    ElbowRight = 13,
    WristRight = 14,
    HandRight = 15,
    HandtipRight = 16,
    ThumbRight = 17,
    HipLeft = 18,
    KneeLeft = 19,
    AnkleLeft = 20,
    FootLeft = 21,
    HipRight = 22,
    KneeRight = 23,
    AnkleRight = 24,
    FootRight = 25,
    Head = 26,
    Nose = 27,
    EyeLeft = 28,
    EarLeft = 29,
    EyeRight = 30,
    EarRight = 31,
}

impl JointId {
    pub const COUNT: usize = 32;

    /// 正準順序の全関節（CSV列順と同一）
    pub const ALL: [JointId; Self::COUNT] = [
        Self::Pelvis,
        Self::SpineNavel,
        Self::SpineChest,
        Self::Neck,
        Self::ClavicleLeft,
        Self::ShoulderLeft,
        Self::ElbowLeft,
        Self::WristLeft,
        Self::HandLeft,
        Self::HandtipLeft,
        Self::ThumbLeft,
        Self::ClavicleRight,
        Self::ShoulderRight,
        Self::ElbowRight,
        Self::WristRight,
        Self::HandRight,
        Self::HandtipRight,
        Self::ThumbRight,
        Self::HipLeft,
        Self::KneeLeft,
        Self::AnkleLeft,
        Self::FootLeft,
        Self::HipRight,
        Self::KneeRight,
        Self::AnkleRight,
        Self::FootRight,
        Self::Head,
        Self::Nose,
        Self::EyeLeft,
        Self::EarLeft,
        Self::EyeRight,
        Self::EarRight,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// CSVヘッダで使う正準名
    pub fn name(self) -> &'static str {
        match self {
            Self::Pelvis => "PELVIS",
            Self::SpineNavel => "SPINE_NAVEL",
            Self::SpineChest => "SPINE_CHEST",
            Self::Neck => "NECK",
            Self::ClavicleLeft => "CLAVICLE_LEFT",
            Self::ShoulderLeft => "SHOULDER_LEFT",
            Self::ElbowLeft => "ELBOW_LEFT",
            Self::WristLeft => "WRIST_LEFT",
            Self::HandLeft => "HAND_LEFT",
            Self::HandtipLeft => "HANDTIP_LEFT",
            Self::ThumbLeft => "THUMB_LEFT",
            Self::ClavicleRight => "CLAVICLE_RIGHT",
            Self::ShoulderRight => "SHOULDER_RIGHT",
            Self::ElbowRight => "ELBOW_RIGHT",
            Self::WristRight => "WRIST_RIGHT",
            Self::HandRight => "HAND_RIGHT",
            Self::HandtipRight => "HANDTIP_RIGHT",
            Self::ThumbRight => "THUMB_RIGHT",
            Self::HipLeft => "HIP_LEFT",
            Self::KneeLeft => "KNEE_LEFT",
            Self::AnkleLeft => "ANKLE_LEFT",
            Self::FootLeft => "FOOT_LEFT",
            Self::HipRight => "HIP_RIGHT",
            Self::KneeRight => "KNEE_RIGHT",
            Self::AnkleRight => "ANKLE_RIGHT",
            Self::FootRight => "FOOT_RIGHT",
            Self::Head => "HEAD",
            Self::Nose => "NOSE",
            Self::EyeLeft => "EYE_LEFT",
            Self::EarLeft => "EAR_LEFT",
            Self::EyeRight => "EYE_RIGHT",
            Self::EarRight => "EAR_RIGHT",
        }
    }
}

/// 関節位置の信頼度グレード (NONE < LOW < MEDIUM < HIGH)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Confidence {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Confidence {
    /// CSVに書く序数値
    pub fn as_ordinal(self) -> u8 {
        self as u8
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::None
    }
}

/// 単一関節
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    /// 位置 (x, y, z) ミリメートル
    pub position: [f32; 3],
    /// 信頼度グレード
    pub confidence: Confidence,
}

impl Joint {
    pub fn new(position: [f32; 3], confidence: Confidence) -> Self {
        Self {
            position,
            confidence,
        }
    }

    /// 幾何計算用に倍精度ベクトルへ変換
    pub fn position_vector(&self) -> Vector3<f64> {
        Vector3::new(
            self.position[0] as f64,
            self.position[1] as f64,
            self.position[2] as f64,
        )
    }
}

impl Default for Joint {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            confidence: Confidence::None,
        }
    }
}

/// 1フレーム内で追跡された1体の骨格
#[derive(Debug, Clone)]
pub struct Body {
    pub id: u32,
    /// 関節IDで索引する固定長配列（欠け・重複なし）
    pub joints: [Joint; JointId::COUNT],
}

impl Body {
    pub fn new(id: u32, joints: [Joint; JointId::COUNT]) -> Self {
        Self { id, joints }
    }

    /// 関節IDで関節を取得
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id as usize]
    }

    /// 関節位置を倍精度ベクトルで取得
    pub fn joint_position(&self, id: JointId) -> Vector3<f64> {
        self.joint(id).position_vector()
    }
}

impl Default for Body {
    fn default() -> Self {
        Self {
            id: 0,
            joints: [Joint::default(); JointId::COUNT],
        }
    }
}

/// 1回の観測（タイムスタンプ + 0体以上のボディ）
///
/// コアは保持しない。フレームごとに処理して破棄する。
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// マイクロ秒タイムスタンプ（または呼び出し側が与える論理フレーム番号）
    pub timestamp_us: u64,
    pub bodies: Vec<Body>,
}

impl Frame {
    pub fn new(timestamp_us: u64, bodies: Vec<Body>) -> Self {
        Self {
            timestamp_us,
            bodies,
        }
    }
}
